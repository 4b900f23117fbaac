//! Wire types exchanged with the move-suggestion and analysis backends.

pub mod protocol;
