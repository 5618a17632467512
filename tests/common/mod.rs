pub mod synthetic_body;
