/// ffmpeg-backed MP4 sink.
pub mod ffmpeg;
/// Frame sink trait and an in-memory sink.
pub mod sink;
