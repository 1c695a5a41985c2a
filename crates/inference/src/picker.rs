//! Asynchronous "pick an image" requests.
//!
//! The requester sends a [`PickRequest`] over a channel and awaits the reply;
//! whatever provides images (a camera, a photo library, a list of paths)
//! answers on the other end.

use preprocess::SourceImage;
use std::fmt;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Split};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickSource {
    Camera,
    #[default]
    Library,
}

impl FromStr for PickSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "camera" => Ok(PickSource::Camera),
            "library" | "photos" => Ok(PickSource::Library),
            other => Err(format!("unknown pick source: {other}")),
        }
    }
}

impl fmt::Display for PickSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickSource::Camera => f.write_str("camera"),
            PickSource::Library => f.write_str("library"),
        }
    }
}

#[derive(Debug)]
pub enum PickOutcome {
    Picked(SourceImage),
    Cancelled,
}

#[derive(Debug)]
pub struct PickRequest {
    pub source: PickSource,
    pub reply: oneshot::Sender<PickOutcome>,
}

#[derive(Debug, Clone)]
pub struct PickerHandle {
    requests: mpsc::Sender<PickRequest>,
}

pub fn channel(capacity: usize) -> (PickerHandle, mpsc::Receiver<PickRequest>) {
    let (tx, rx) = mpsc::channel(capacity);
    (PickerHandle { requests: tx }, rx)
}

impl PickerHandle {
    /// Ask for an image. `None` once the provider has shut down.
    pub async fn pick(&self, source: PickSource) -> Option<PickOutcome> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(PickRequest { source, reply })
            .await
            .ok()?;
        response.await.ok()
    }
}

/// Answers pick requests with images named by one file path per line.
///
/// An empty line cancels the pick; so does a line that is not UTF-8 or a
/// path that cannot be opened or decoded. End of input shuts the provider
/// down. Only read errors on the underlying reader stop it early.
pub struct PathPicker<R> {
    lines: Split<R>,
}

impl<R: AsyncBufRead + Unpin> PathPicker<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.split(b'\n'),
        }
    }

    pub async fn serve(mut self, mut requests: mpsc::Receiver<PickRequest>) -> anyhow::Result<()> {
        while let Some(request) = requests.recv().await {
            let Some(raw) = self.lines.next_segment().await? else {
                tracing::debug!("Image source exhausted");
                break;
            };

            let outcome = match String::from_utf8(raw) {
                Ok(line) => resolve(line.trim(), request.source).await,
                Err(e) => {
                    tracing::warn!(error = %e, "Picked path is not valid UTF-8");
                    PickOutcome::Cancelled
                }
            };
            if request.reply.send(outcome).is_err() {
                tracing::debug!("Pick requester went away");
            }
        }
        Ok(())
    }
}

async fn resolve(path: &str, source: PickSource) -> PickOutcome {
    if path.is_empty() {
        tracing::debug!(?source, "Pick cancelled");
        return PickOutcome::Cancelled;
    }

    let owned = path.to_string();
    match tokio::task::spawn_blocking(move || SourceImage::open(owned)).await {
        Ok(Ok(image)) => {
            tracing::debug!(
                ?source,
                path,
                width = image.width(),
                height = image.height(),
                "Image picked"
            );
            PickOutcome::Picked(image)
        }
        Ok(Err(e)) => {
            tracing::warn!(path, error = %e, "Could not open picked image");
            PickOutcome::Cancelled
        }
        Err(e) => {
            tracing::warn!(path, error = %e, "Image loader task failed");
            PickOutcome::Cancelled
        }
    }
}
