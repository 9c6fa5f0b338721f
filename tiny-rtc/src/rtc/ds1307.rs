//! Driver for the DS1307 serial real-time clock.
//!
//! The chip keeps time in seven BCD registers starting at address `0x00`:
//!
//! | Register | Contents                                  |
//! |----------|-------------------------------------------|
//! | `0x00`   | seconds, bit 7 is the clock-halt flag     |
//! | `0x01`   | minutes                                   |
//! | `0x02`   | hours                                     |
//! | `0x03`   | day of week (written as 0, never read)    |
//! | `0x04`   | day of month                              |
//! | `0x05`   | month                                     |
//! | `0x06`   | year, as an offset from 2000              |
//!
//! The register pointer auto-increments after every byte, so a whole block can
//! be read or written in a single transfer.
//!
//! Transfers block until the bus driver returns. There is no timeout beyond
//! whatever the bus driver provides.

use core::fmt;

use embedded_hal::i2c::{Error as _, I2c};

use crate::time::calendar::{bcd_to_bin, bin_to_bcd};
use crate::time::{ClockSource, DateTime};

/// Fixed 7-bit bus address of the DS1307.
pub const DS1307_ADDRESS: u8 = 0x68;

#[allow(dead_code)]
mod register {
    pub const SECONDS: u8 = 0x00;
    pub const MINUTES: u8 = 0x01;
    pub const HOURS: u8 = 0x02;
    pub const DAY: u8 = 0x03;
    pub const DATE: u8 = 0x04;
    pub const MONTH: u8 = 0x05;
    pub const YEAR: u8 = 0x06;
    pub const CONTROL: u8 = 0x07;
}

/// Clock-halt flag in the seconds register.
const CLOCK_HALT: u8 = 0x80;

/// Number of timekeeping registers, `SECONDS` through `YEAR`.
const TIME_REGISTERS: usize = (register::YEAR - register::SECONDS + 1) as usize;

/// DS1307 error.
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ds1307Error<E> {
    /// The underlying bus transfer failed.
    I2c(E),
}

impl<E: embedded_hal::i2c::Error> fmt::Display for Ds1307Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "DS1307 bus transfer failed: {}", e.kind()),
        }
    }
}

/// A DS1307 real-time clock.
///
/// Holds nothing but the bus; all time state lives in the chip's registers.
/// The bus must already be initialised when it is handed over.
pub struct Ds1307<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ds1307<I2C> {
    /// Creates a driver for the chip at [`DS1307_ADDRESS`] on `i2c`.
    pub const fn new(i2c: I2C) -> Self {
        Ds1307 { i2c }
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Initialises the driver. The chip needs no setup, so this always succeeds.
    pub fn begin(&mut self) -> Result<(), Ds1307Error<I2C::Error>> {
        Ok(())
    }

    /// Returns whether the oscillator is running, i.e. the clock-halt flag is clear.
    pub fn is_running(&mut self) -> Result<bool, Ds1307Error<I2C::Error>> {
        let mut seconds = [0u8];
        self.i2c
            .write_read(DS1307_ADDRESS, &[register::SECONDS], &mut seconds)
            .map_err(Ds1307Error::I2c)?;

        let running = seconds[0] & CLOCK_HALT == 0;
        if !running {
            debug!("ds1307: clock halted");
        }
        Ok(running)
    }
}

impl<I2C: I2c> ClockSource for Ds1307<I2C> {
    type Error = Ds1307Error<I2C::Error>;

    fn now(&mut self) -> Result<DateTime, Self::Error> {
        let mut data = [0u8; TIME_REGISTERS];
        self.i2c
            .write_read(DS1307_ADDRESS, &[register::SECONDS], &mut data)
            .map_err(Ds1307Error::I2c)?;
        trace!("ds1307: read {} time registers", TIME_REGISTERS);

        let [seconds, minutes, hours, _day, date, month, year] = data;
        Ok(DateTime::new(
            2000 + bcd_to_bin(year) as u16,
            bcd_to_bin(month),
            bcd_to_bin(date),
            bcd_to_bin(hours),
            bcd_to_bin(minutes),
            bcd_to_bin(seconds & !CLOCK_HALT),
        ))
    }

    /// Writes the time registers in one transfer.
    ///
    /// The register pointer byte is sent again after the year, so the
    /// auto-incremented pointer lands that `0x00` in the control register
    /// and the square-wave output is switched off. Writing the seconds
    /// register also clears the clock-halt flag, which starts the clock.
    ///
    /// The write is not transactional: if the bus fails part way, the chip
    /// is left holding a mix of old and new values.
    fn adjust(&mut self, datetime: &DateTime) -> Result<(), Self::Error> {
        let frame = [
            register::SECONDS,
            bin_to_bcd(datetime.second()),
            bin_to_bcd(datetime.minute()),
            bin_to_bcd(datetime.hour()),
            bin_to_bcd(0),
            bin_to_bcd(datetime.day()),
            bin_to_bcd(datetime.month()),
            bin_to_bcd((datetime.year() - 2000) as u8),
            register::SECONDS,
        ];
        self.i2c
            .write(DS1307_ADDRESS, &frame)
            .map_err(Ds1307Error::I2c)?;
        trace!("ds1307: time set to {}", datetime);
        Ok(())
    }

    const MAX_RESOLUTION_HZ: u32 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    /// Register-level model of a DS1307: 64 bytes of register space with an
    /// auto-incrementing, wrapping pointer. Every write is recorded.
    struct FakeDs1307 {
        registers: [u8; 64],
        pointer: usize,
        writes: Vec<Vec<u8>>,
        connected: bool,
    }

    impl FakeDs1307 {
        fn new() -> Self {
            FakeDs1307 {
                registers: [0; 64],
                pointer: 0,
                writes: Vec::new(),
                connected: true,
            }
        }

        fn with_time_registers(time: [u8; TIME_REGISTERS]) -> Self {
            let mut chip = Self::new();
            chip.registers[..TIME_REGISTERS].copy_from_slice(&time);
            chip
        }

        fn step(&mut self) {
            self.pointer = (self.pointer + 1) % self.registers.len();
        }
    }

    impl ErrorType for FakeDs1307 {
        type Error = ErrorKind;
    }

    impl I2c for FakeDs1307 {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            if !self.connected || address != DS1307_ADDRESS {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for operation in operations {
                match operation {
                    Operation::Write(bytes) => {
                        self.writes.push(bytes.to_vec());
                        if let Some((&pointer, data)) = bytes.split_first() {
                            self.pointer = pointer as usize % self.registers.len();
                            for &byte in data {
                                self.registers[self.pointer] = byte;
                                self.step();
                            }
                        }
                    }
                    Operation::Read(buffer) => {
                        for byte in buffer.iter_mut() {
                            *byte = self.registers[self.pointer];
                            self.step();
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_begin_always_succeeds() {
        let mut rtc = Ds1307::new(FakeDs1307::new());
        assert_eq!(rtc.begin(), Ok(()));
        assert!(rtc.release().writes.is_empty());
    }

    #[test]
    fn test_is_running() {
        let mut rtc = Ds1307::new(FakeDs1307::with_time_registers([0x12, 0, 0, 0, 1, 1, 0]));
        assert_eq!(rtc.is_running(), Ok(true));

        let mut rtc = Ds1307::new(FakeDs1307::with_time_registers([CLOCK_HALT | 0x12, 0, 0, 0, 1, 1, 0]));
        assert_eq!(rtc.is_running(), Ok(false));

        let chip = rtc.release();
        assert_eq!(chip.writes, vec![vec![register::SECONDS]]);
    }

    #[test]
    fn test_now_decodes_registers() {
        let mut rtc = Ds1307::new(FakeDs1307::with_time_registers([0x45, 0x30, 0x23, 0x07, 0x31, 0x12, 0x99]));
        assert_eq!(rtc.now(), Ok(DateTime::new(2099, 12, 31, 23, 30, 45)));
    }

    #[test]
    fn test_now_ignores_halt_flag_and_day_of_week() {
        let mut rtc = Ds1307::new(FakeDs1307::with_time_registers([
            CLOCK_HALT | 0x05,
            0x04,
            0x03,
            0x06,
            0x02,
            0x01,
            0x21,
        ]));
        assert_eq!(rtc.now(), Ok(DateTime::new(2021, 1, 2, 3, 4, 5)));
    }

    #[test]
    fn test_adjust_wire_format() {
        let mut chip = FakeDs1307::new();
        chip.registers[register::CONTROL as usize] = 0x10;
        let mut rtc = Ds1307::new(chip);

        rtc.adjust(&DateTime::new(2021, 1, 2, 3, 4, 5)).expect("adjust should succeed");

        let chip = rtc.release();
        assert_eq!(
            chip.writes,
            vec![vec![0x00, 0x05, 0x04, 0x03, 0x00, 0x02, 0x01, 0x21, 0x00]]
        );
        assert_eq!(
            chip.registers[..=register::CONTROL as usize],
            [0x05, 0x04, 0x03, 0x00, 0x02, 0x01, 0x21, 0x00]
        );
        assert_eq!(chip.registers[register::DAY as usize], 0);
        assert_eq!(chip.registers[register::CONTROL as usize], 0, "control register is cleared");
    }

    #[test]
    fn test_adjust_starts_halted_clock() {
        let mut rtc = Ds1307::new(FakeDs1307::with_time_registers([CLOCK_HALT, 0, 0, 0, 1, 1, 0]));
        assert_eq!(rtc.is_running(), Ok(false));

        rtc.adjust(&DateTime::new(2024, 2, 29, 12, 0, 0)).expect("adjust should succeed");
        assert_eq!(rtc.is_running(), Ok(true));
    }

    #[test]
    fn test_adjust_then_now() {
        let mut rtc = Ds1307::new(FakeDs1307::new());
        for dt in [
            DateTime::new(2000, 1, 1, 0, 0, 0),
            DateTime::new(2038, 1, 19, 3, 14, 7),
            DateTime::new(2099, 12, 31, 23, 59, 59),
        ] {
            rtc.adjust(&dt).expect("adjust should succeed");
            assert_eq!(rtc.now(), Ok(dt));
        }

        let chip = rtc.release();
        assert_eq!(chip.registers[register::MINUTES as usize], 0x59);
        assert_eq!(chip.registers[register::HOURS as usize], 0x23);
        assert_eq!(chip.registers[register::DATE as usize], 0x31);
        assert_eq!(chip.registers[register::MONTH as usize], 0x12);
        assert_eq!(chip.registers[register::YEAR as usize], 0x99);
    }

    #[test]
    fn test_bus_errors_are_reported() {
        let mut chip = FakeDs1307::new();
        chip.connected = false;
        let mut rtc = Ds1307::new(chip);
        let nack = Ds1307Error::I2c(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));

        assert_eq!(rtc.begin(), Ok(()));
        assert_eq!(rtc.is_running(), Err(nack));
        assert_eq!(rtc.now(), Err(nack));
        assert_eq!(rtc.adjust(&DateTime::default()), Err(nack));
        assert_eq!(
            nack.to_string(),
            format!(
                "DS1307 bus transfer failed: {}",
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            )
        );
    }

    #[test]
    fn test_usable_as_clock_source() {
        fn sync<C: ClockSource>(from: &mut C, to: &mut impl ClockSource) {
            if let Ok(now) = from.now() {
                let _ = to.adjust(&now);
            }
        }

        let mut source = Ds1307::new(FakeDs1307::with_time_registers([0x00, 0x00, 0x12, 0x00, 0x15, 0x06, 0x25]));
        let mut target = Ds1307::new(FakeDs1307::new());
        sync(&mut &mut source, &mut target);

        assert_eq!(target.now(), Ok(DateTime::new(2025, 6, 15, 12, 0, 0)));
        assert_eq!(<Ds1307<FakeDs1307> as ClockSource>::MAX_RESOLUTION_HZ, 1);
    }
}
