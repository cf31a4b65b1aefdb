//! Block I/O traits: BlockReader, BlockWriter.

use crate::{Address, BlockValue, CancellationToken, Error};

/// Read blocks from a device.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn BlockReader>`.
pub trait BlockReader: Send {
    /// Read the current value of a block.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The block is not present on the device.
    /// * `Ok(Some(value))` - The block's current value.
    /// * `Err(Error)` - A transport fault occurred.
    fn read_block(&mut self, address: Address) -> Result<Option<BlockValue>, Error>;
}

/// Compare-and-set writes against a device.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn BlockWriter>`.
pub trait BlockWriter: Send {
    /// Write `value` to `address` only if the block currently holds `expected`.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The comparison held and the write was performed.
    /// * `Ok(false)` - The comparison failed, or the write could not be
    ///   performed (including an attempt abandoned through `cancel`).
    /// * `Err(Error)` - A transport fault occurred.
    fn write_block(
        &mut self,
        value: &BlockValue,
        address: Address,
        cancel: &CancellationToken,
        expected: &BlockValue,
    ) -> Result<bool, Error>;
}

/// Combined read/write access to a device.
pub trait BlockDevice: BlockReader + BlockWriter {}
impl<T: BlockReader + BlockWriter> BlockDevice for T {}

// Blanket implementations for references and boxes

impl<T: BlockReader + ?Sized> BlockReader for &mut T {
    fn read_block(&mut self, address: Address) -> Result<Option<BlockValue>, Error> {
        (*self).read_block(address)
    }
}

impl<T: BlockWriter + ?Sized> BlockWriter for &mut T {
    fn write_block(
        &mut self,
        value: &BlockValue,
        address: Address,
        cancel: &CancellationToken,
        expected: &BlockValue,
    ) -> Result<bool, Error> {
        (*self).write_block(value, address, cancel, expected)
    }
}

impl<T: BlockReader + ?Sized> BlockReader for Box<T> {
    fn read_block(&mut self, address: Address) -> Result<Option<BlockValue>, Error> {
        self.as_mut().read_block(address)
    }
}

impl<T: BlockWriter + ?Sized> BlockWriter for Box<T> {
    fn write_block(
        &mut self,
        value: &BlockValue,
        address: Address,
        cancel: &CancellationToken,
        expected: &BlockValue,
    ) -> Result<bool, Error> {
        self.as_mut().write_block(value, address, cancel, expected)
    }
}
