//! Upper Protocol Layer
//!
//! The network stack above the driver. It receives validated inbound frames
//! and supplies outbound frames when the driver polls for them.
//!
//! There is no queue inside the driver: while a frame is in flight the
//! driver does not poll, and the upper layer keeps any frame it has not
//! handed out yet.

use crate::error::IoResult;

/// Frame sink and frame source
pub trait UpperLayer {
    /// Accept one complete inbound Ethernet frame
    ///
    /// An error drops the frame; the driver counts it and carries on.
    fn deliver_frame(&mut self, frame: &[u8]) -> IoResult<()>;

    /// Copy the next outbound frame into `buf`
    ///
    /// Returns the frame length, or `0` when nothing is pending.
    fn next_frame(&mut self, buf: &mut [u8]) -> IoResult<usize>;
}

impl<T: UpperLayer + ?Sized> UpperLayer for &mut T {
    fn deliver_frame(&mut self, frame: &[u8]) -> IoResult<()> {
        (**self).deliver_frame(frame)
    }

    fn next_frame(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        (**self).next_frame(buf)
    }
}
