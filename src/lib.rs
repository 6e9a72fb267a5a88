//! Render chat history into a scrolling chat-overlay video.
//!
//! The pipeline is:
//! 1. parse chat history ([`parse_chat_history`]) and an emote pack ([`EmotePack`])
//! 2. lay out each message once into lines of positioned drawables ([`LayoutEngine`])
//! 3. composite the bottom-anchored message stack for every frame ([`ScrollCompositor`])
//! 4. stream frames into a [`FrameSink`] (ffmpeg MP4 or in memory)
//!
//! [`ChatVideo`] drives all of it with progress reporting and cancellation.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod chat;
/// Video configuration file.
pub mod config;
mod encode;
mod foundation;
mod layout;
mod render;
mod session;
mod text;
mod tokens;

pub use assets::decode::decode_image;
pub use assets::fetch::{DirFetcher, ImageFetcher, MemoryFetcher};
pub use assets::store::{DecodedImage, ImageArena, ImageFrame, ImageId};
pub use chat::history::{load_chat_history, parse_chat_history};
pub use chat::message::{BadgeRef, ChatMessage, ChatSource, EmoteOccurrence};
pub use config::VideoConfig;
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Fps, FrameIndex, Rgba8};
pub use foundation::error::{ReelError, ReelResult};
pub use layout::engine::{
    BADGE_PAD, EMOTE_PAD, HORIZONTAL_PAD, LayoutEngine, LayoutOpts, VERTICAL_PAD,
};
pub use layout::model::{Drawable, DrawableKind, DrawableMessage, Line};
pub use layout::palette::{AuthorPalette, contrast};
pub use render::animator::sub_frame_for;
pub use render::canvas::{CpuCanvas, FrameRGBA};
pub use render::compositor::{Admission, CompositorOpts, Placement, ScrollCompositor};
pub use session::progress::{CancelToken, NoProgress, Phase, Progress, ProgressObserver};
pub use session::video::{ChatVideo, RenderOutcome, RenderStats};
pub use text::block::BlockText;
pub use text::engine::{FontWeight, TextEngine, TextSize};
pub use text::parley::ParleyText;
pub use tokens::cheer::{Cheer, CheerTable, parse_cheer_token};
pub use tokens::manifest::{CheerAction, CheerTierDef, EmotePack};
pub use tokens::resolver::{PackResolver, ResolvedImage, ThirdPartyProvider, TokenResolver};
