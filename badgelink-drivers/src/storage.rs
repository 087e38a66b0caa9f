//! Storage and crypto operations
//!
//! Each operation is one transaction: the request goes into the scratch
//! block, [`Coprocessor::update`] sends it and waits for the reply, and the
//! reply overwrites the scratch block. Data fields hold at most 12 bytes.
//!
//! The coprocessor answers a failed operation with an all-ones status
//! nibble, surfaced as [`NvmError::Failed`].

use badgelink_hal::{OutputPin, SpiBus};
use badgelink_protocol::nvm::NAVHASH_SLOTS;
use badgelink_protocol::{NavHashBlock, NvmOp, NvmReply, NvmRequest, ResponseMask, NVM_DATA_LEN};
use heapless::Vec;

use crate::coprocessor::Coprocessor;
use crate::error::NvmError;

/// Hash seed slot used for button-sequence hashes
pub const BUTTON_HASH_IV: u8 = 0;

/// Bytes produced by a hash operation
pub const HASH_LEN: usize = 4;

/// Cipher block size
const CIPHER_BLOCK: usize = 4;

impl<S, CS, X> Coprocessor<S, CS, X>
where
    S: SpiBus,
    CS: OutputPin,
    X: OutputPin,
{
    /// Read up to 12 bytes of program flash into `buf`
    ///
    /// Returns the number of bytes read.
    pub fn read_flash(
        &mut self,
        address: u16,
        buf: &mut [u8],
    ) -> Result<usize, NvmError<S::Error>> {
        self.read_into(NvmOp::FlashRead, address, buf)
    }

    /// Read up to 12 bytes of EEPROM into `buf`
    pub fn read_eeprom(
        &mut self,
        address: u16,
        buf: &mut [u8],
    ) -> Result<usize, NvmError<S::Error>> {
        self.read_into(NvmOp::EepromRead, address, buf)
    }

    /// Write up to 12 bytes to EEPROM
    ///
    /// Returns the number of bytes written; the rest of `data` is dropped.
    pub fn write_eeprom(&mut self, address: u16, data: &[u8]) -> Result<usize, NvmError<S::Error>> {
        let request = NvmRequest::with_data(NvmOp::EepromWrite, address, data);
        self.nvm_transaction(&request)?;
        Ok(usize::from(request.len))
    }

    /// Encrypt `data` in place with internal key `key`
    pub fn encrypt(&mut self, key: u8, data: &mut [u8]) -> Result<(), NvmError<S::Error>> {
        self.cipher(NvmOp::Encrypt, key, data)
    }

    /// Decrypt `data` in place with internal key `key`
    pub fn decrypt(&mut self, key: u8, data: &mut [u8]) -> Result<(), NvmError<S::Error>> {
        self.cipher(NvmOp::Decrypt, key, data)
    }

    /// Hash up to 12 bytes of `data` with internal seed `iv`
    pub fn hash(&mut self, iv: u8, data: &[u8]) -> Result<u32, NvmError<S::Error>> {
        let request = NvmRequest::with_data(NvmOp::Hash, u16::from(iv), data);
        let reply = self.nvm_transaction(&request)?;
        let mut out = [0u8; HASH_LEN];
        out.copy_from_slice(&reply.data[..HASH_LEN]);
        Ok(u32::from_le_bytes(out))
    }

    /// Hash `value` together with the last `entries` button presses
    pub fn button_hash(&mut self, entries: usize, value: u32) -> Result<u32, NvmError<S::Error>> {
        let mut buf = [0u8; 8];
        buf[..4].copy_from_slice(&value.to_le_bytes());
        buf[4..].copy_from_slice(&self.history.recent(entries).to_le_bytes());
        self.hash(BUTTON_HASH_IV, &buf)
    }

    /// Navigation hash of one value over the last `entries` presses
    pub fn nav_hash(&mut self, entries: u8, value: u32) -> Result<u32, NvmError<S::Error>> {
        let hashes = self.nav_hashes(&[(entries, value)])?;
        hashes.first().copied().ok_or(NvmError::Timeout)
    }

    /// Navigation hashes of up to three `(entries, value)` pairs in one
    /// transaction
    ///
    /// The coprocessor keeps its own navigation history; `entries` selects
    /// how much of it each value is folded with.
    pub fn nav_hashes(
        &mut self,
        requests: &[(u8, u32)],
    ) -> Result<Vec<u32, NAVHASH_SLOTS>, NvmError<S::Error>> {
        if requests.len() > NAVHASH_SLOTS {
            return Err(NvmError::TooManyHashes);
        }

        let mut block = NavHashBlock::default();
        for (slot, (entries, value)) in requests.iter().enumerate() {
            block.lens[slot] = *entries;
            block.values[slot] = *value;
        }

        self.state.set_scratch(block.to_block());
        let report = self.update(ResponseMask::NAVHASH)?;
        if report.missing.contains(ResponseMask::NAVHASH) {
            warn!("navigation hash timed out");
            return Err(NvmError::Timeout);
        }

        let reply = NavHashBlock::from_block(self.state.scratch());
        Ok(reply.values.iter().copied().take(requests.len()).collect())
    }

    fn read_into(
        &mut self,
        op: NvmOp,
        address: u16,
        buf: &mut [u8],
    ) -> Result<usize, NvmError<S::Error>> {
        let request = NvmRequest::read(op, address, buf.len());
        let reply = self.nvm_transaction(&request)?;
        let n = usize::from(request.len);
        buf[..n].copy_from_slice(&reply.data[..n]);
        Ok(n)
    }

    fn cipher(&mut self, op: NvmOp, key: u8, data: &mut [u8]) -> Result<(), NvmError<S::Error>> {
        if data.len() > NVM_DATA_LEN || data.len() % CIPHER_BLOCK != 0 {
            return Err(NvmError::InvalidLength);
        }
        let request = NvmRequest::with_data(op, u16::from(key), data);
        let reply = self.nvm_transaction(&request)?;
        let n = data.len();
        data.copy_from_slice(&reply.data[..n]);
        Ok(())
    }

    fn nvm_transaction(&mut self, request: &NvmRequest) -> Result<NvmReply, NvmError<S::Error>> {
        self.state.set_scratch(request.to_block());
        let report = self.update(ResponseMask::NVM_RESULT)?;
        if report.missing.contains(ResponseMask::NVM_RESULT) {
            warn!("storage operation timed out");
            return Err(NvmError::Timeout);
        }

        let reply = NvmReply::from_block(self.state.scratch());
        if reply.is_error() {
            let status = self.state.scratch()[0];
            warn!("storage operation failed, status {=u8:#x}", status);
            return Err(NvmError::Failed { status });
        }
        Ok(reply)
    }
}
