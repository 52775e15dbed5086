// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums, and traits that define the core
// concepts of the pipeline.
//
// Rules for this layer:
//   - NO linfa / ndarray types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Think of this layer as the "dictionary" of the system:
// it defines what things ARE, not how they work.

// Raw and cleaned comment records
pub mod record;

// Error taxonomy shared by every layer
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
