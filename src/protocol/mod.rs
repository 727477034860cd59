pub mod decode;
pub mod modbus;
pub mod reference;
pub mod registers;
pub mod transport;
