pub mod rpi_touch;
