use std::path::PathBuf;

/// Failures while bringing up the window and its resources.
///
/// The wheel itself cannot fail; only the host around it can.
#[derive(Debug, thiserror::Error)]
pub enum WheelError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("pixel surface failed: {0}")]
    Surface(#[from] pixels::Error),
    #[error("could not read font {path}: {source}")]
    FontRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0} is not a usable TrueType/OpenType font")]
    FontParse(PathBuf),
}
