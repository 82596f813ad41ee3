pub mod bmp280;
pub mod dht22;
pub mod mq135;
