pub mod bookingdb;
pub mod categorydb;
pub mod db;
pub mod paymentdb;
pub mod reviewdb;
pub mod servicedb;
pub mod userdb;
