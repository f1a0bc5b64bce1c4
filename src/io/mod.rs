/*!
# IO utilities

Persistence of processed graph batches.

Currently only saving is implemented; loading is planned in order to
facilitate operations on already generated batches.
!*/
pub mod writer;
pub use writer::BatchWriter;
