use crate::platform::{DelayOps, I2cOps};

const ADXL345_ADDR: u8 = 0x53;

const REG_DEVID: u8 = 0x00;
const REG_OFSX: u8 = 0x1E;
const REG_BW_RATE: u8 = 0x2C;
const REG_POWER_CTL: u8 = 0x2D;
const REG_DATA_FORMAT: u8 = 0x31;
const REG_DATAX0: u8 = 0x32;

const DEVID_VALUE: u8 = 0xE5;
const VAL_LOW_POWER_25HZ: u8 = 0x18;
const VAL_MEASURE: u8 = 0x08;
const VAL_FULL_RES_2G: u8 = 0x08;

#[derive(Debug)]
pub enum Adxl345Error<E> {
    I2c(E),
    UnknownDevice(u8),
}

impl<E> From<E> for Adxl345Error<E> {
    fn from(value: E) -> Self {
        Self::I2c(value)
    }
}

pub type Result<T, E> = core::result::Result<T, Adxl345Error<E>>;

/// Register-level driver for the ADXL345 accelerometer. All axis data is
/// fetched in one burst so a sample is consistent across axes.
pub struct Adxl345<I2C, D> {
    i2c: I2C,
    delay: D,
}

impl<I2C, D> Adxl345<I2C, D>
where
    I2C: I2cOps,
    D: DelayOps,
{
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self { i2c, delay }
    }

    /// Low-power 25 Hz output rate, full-resolution +/-2 g, measurement on.
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        let id = self.read_reg(REG_DEVID)?;
        if id != DEVID_VALUE {
            return Err(Adxl345Error::UnknownDevice(id));
        }

        self.write_reg(REG_BW_RATE, VAL_LOW_POWER_25HZ)?;
        self.write_reg(REG_POWER_CTL, VAL_MEASURE)?;
        self.write_reg(REG_DATA_FORMAT, VAL_FULL_RES_2G)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    pub fn read_axes(&mut self) -> Result<[i16; 3], I2C::Error> {
        let mut raw = [0u8; 6];
        self.i2c_write_read(&[REG_DATAX0], &mut raw)?;
        Ok([
            i16::from_le_bytes([raw[0], raw[1]]),
            i16::from_le_bytes([raw[2], raw[3]]),
            i16::from_le_bytes([raw[4], raw[5]]),
        ])
    }

    /// Offset registers use 15.6 mg/LSB, four data LSBs per offset count.
    pub fn write_offsets(&mut self, offsets: [i8; 3]) -> Result<(), I2C::Error> {
        self.i2c_write(&[
            REG_OFSX,
            offsets[0] as u8,
            offsets[1] as u8,
            offsets[2] as u8,
        ])
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, I2C::Error> {
        let mut buf = [0u8; 1];
        self.i2c_write_read(&[reg], &mut buf)?;
        Ok(buf[0])
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c_write(&[reg, value])
    }

    fn i2c_write(&mut self, bytes: &[u8]) -> Result<(), I2C::Error> {
        match self.i2c.write(ADXL345_ADDR, bytes) {
            Ok(()) => Ok(()),
            Err(_) => {
                let _ = self.i2c.reset();
                self.delay.delay_ms(1);
                self.i2c
                    .write(ADXL345_ADDR, bytes)
                    .map_err(Adxl345Error::I2c)
            }
        }
    }

    fn i2c_write_read(&mut self, bytes: &[u8], buffer: &mut [u8]) -> Result<(), I2C::Error> {
        match self.i2c.write_read(ADXL345_ADDR, bytes, buffer) {
            Ok(()) => Ok(()),
            Err(_) => {
                let _ = self.i2c.reset();
                self.delay.delay_ms(1);
                self.i2c
                    .write_read(ADXL345_ADDR, bytes, buffer)
                    .map_err(Adxl345Error::I2c)
            }
        }
    }
}
