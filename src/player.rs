//! The player screen's transport: one decoder, a cursor into the launched
//! track list, the refresh tick and the rotating artwork indicator.

mod seek;
mod spinner;
mod ticker;
mod transport;
mod view;

pub use seek::SeekBar;
pub use spinner::Spinner;
pub use ticker::Ticker;
pub use transport::{Direction, Transport, TransportSettings};
pub use view::{NowPlaying, TransportState};
