/// Fixed-advance block glyphs for deterministic output.
pub mod block;
/// Text measuring and painting seam.
pub mod engine;
/// Parley-shaped text painted with `vello_cpu`.
pub mod parley;
