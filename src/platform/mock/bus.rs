//! Mock SPI and I2C devices for testing
//!
//! Both record register-level transactions and serve scripted read data.
//! Each read pops the next scripted response; missing bytes read as zero.

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::i2c::{ErrorKind as I2cErrorKind, NoAcknowledgeSource};
use embedded_hal::spi::ErrorKind as SpiErrorKind;

/// Bus transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusTransaction {
    /// Register read: register byte written, `len` bytes clocked in
    Read { reg: u8, len: usize },
    /// Plain write of the given bytes
    Write(Vec<u8>),
}

#[derive(Debug, Default)]
struct MockBusState {
    transactions: Vec<BusTransaction>,
    reads: VecDeque<Vec<u8>>,
    failures: usize,
    last_address: Option<u8>,
}

impl MockBusState {
    fn take_failure(&mut self) -> bool {
        if self.failures > 0 {
            self.failures -= 1;
            true
        } else {
            false
        }
    }

    fn serve_read(&mut self, reg: u8, buf: &mut [u8]) {
        self.transactions.push(BusTransaction::Read {
            reg,
            len: buf.len(),
        });
        buf.fill(0);
        if let Some(data) = self.reads.pop_front() {
            let n = buf.len().min(data.len());
            buf[..n].copy_from_slice(&data[..n]);
        }
    }

    fn record_write(&mut self, data: &[u8]) {
        self.transactions.push(BusTransaction::Write(data.to_vec()));
    }
}

macro_rules! mock_bus_common {
    ($name:ident) => {
        impl $name {
            /// Create a new mock with no scripted data
            pub fn new() -> Self {
                Self {
                    state: Rc::new(RefCell::new(MockBusState::default())),
                }
            }

            /// Queue data for the next register read
            pub fn push_read(&self, data: &[u8]) {
                self.state.borrow_mut().reads.push_back(data.to_vec());
            }

            /// Make the next `count` transactions fail
            pub fn fail_next(&self, count: usize) {
                self.state.borrow_mut().failures = count;
            }

            /// Get transaction log (for test verification)
            pub fn transactions(&self) -> Vec<BusTransaction> {
                self.state.borrow().transactions.clone()
            }

            /// Only the writes, in order
            pub fn writes(&self) -> Vec<Vec<u8>> {
                self.state
                    .borrow()
                    .transactions
                    .iter()
                    .filter_map(|t| match t {
                        BusTransaction::Write(data) => Some(data.clone()),
                        _ => None,
                    })
                    .collect()
            }

            /// Clear transaction log
            pub fn clear_transactions(&self) {
                self.state.borrow_mut().transactions.clear();
            }

            /// Number of scripted reads not yet consumed
            pub fn pending_reads(&self) -> usize {
                self.state.borrow().reads.len()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

/// Mock SPI device (bus + chip-select)
#[derive(Debug, Clone)]
pub struct MockSpi {
    state: Rc<RefCell<MockBusState>>,
}

mock_bus_common!(MockSpi);

impl embedded_hal::spi::ErrorType for MockSpi {
    type Error = SpiErrorKind;
}

impl embedded_hal_async::spi::SpiDevice for MockSpi {
    async fn transaction(
        &mut self,
        operations: &mut [embedded_hal_async::spi::Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        use embedded_hal_async::spi::Operation;

        let mut state = self.state.borrow_mut();
        if state.take_failure() {
            return Err(SpiErrorKind::Other);
        }

        let mut pending_reg: Option<u8> = None;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(data) => {
                    if data.len() == 1 {
                        pending_reg = Some(data[0]);
                    } else {
                        state.record_write(data);
                    }
                }
                Operation::Read(buf) => {
                    let reg = pending_reg.take().unwrap_or(0);
                    state.serve_read(reg, buf);
                }
                Operation::Transfer(read, write) => {
                    state.record_write(write);
                    read.fill(0);
                }
                Operation::TransferInPlace(buf) => {
                    state.record_write(buf);
                }
                Operation::DelayNs(_) => {}
            }
        }
        if let Some(reg) = pending_reg {
            state.record_write(&[reg]);
        }
        Ok(())
    }
}

/// Mock I2C bus
#[derive(Debug, Clone)]
pub struct MockI2c {
    state: Rc<RefCell<MockBusState>>,
}

mock_bus_common!(MockI2c);

impl MockI2c {
    /// Address used by the most recent transaction
    pub fn last_address(&self) -> Option<u8> {
        self.state.borrow().last_address
    }
}

impl embedded_hal::i2c::ErrorType for MockI2c {
    type Error = I2cErrorKind;
}

impl embedded_hal_async::i2c::I2c for MockI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [embedded_hal_async::i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        use embedded_hal_async::i2c::Operation;

        let mut state = self.state.borrow_mut();
        state.last_address = Some(address);
        if state.take_failure() {
            return Err(I2cErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        let mut pending_reg: Option<u8> = None;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(data) => {
                    if data.len() == 1 {
                        pending_reg = Some(data[0]);
                    } else {
                        state.record_write(data);
                    }
                }
                Operation::Read(buf) => {
                    let reg = pending_reg.take().unwrap_or(0);
                    state.serve_read(reg, buf);
                }
            }
        }
        if let Some(reg) = pending_reg {
            state.record_write(&[reg]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_async::i2c::I2c;
    use embedded_hal_async::spi::SpiDevice;

    #[tokio::test]
    async fn test_mock_spi_scripted_reads() {
        let mock = MockSpi::new();
        mock.push_read(&[1, 2, 3, 4]);
        let mut spi = mock.clone();

        let mut buf = [0xFFu8; 6];
        spi.transaction(&mut [
            embedded_hal_async::spi::Operation::Write(&[0x00]),
            embedded_hal_async::spi::Operation::Read(&mut buf),
        ])
        .await
        .unwrap();

        assert_eq!(buf, [1, 2, 3, 4, 0, 0]);
        assert_eq!(
            mock.transactions(),
            vec![BusTransaction::Read { reg: 0, len: 6 }]
        );
        assert_eq!(mock.pending_reads(), 0);
    }

    #[tokio::test]
    async fn test_mock_i2c_write_and_failure() {
        let mock = MockI2c::new();
        let mut i2c = mock.clone();

        i2c.write(0x4A, &[0x01, 0x02]).await.unwrap();
        mock.fail_next(1);
        assert!(i2c.write(0x4A, &[0x03, 0x04]).await.is_err());

        assert_eq!(mock.writes(), vec![vec![0x01, 0x02]]);
        assert_eq!(mock.last_address(), Some(0x4A));
    }
}
