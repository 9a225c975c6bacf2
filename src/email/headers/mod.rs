pub mod received;
