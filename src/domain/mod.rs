mod email;
mod mobile_no;
pub use email::{deserialize_email, EmailObject};
pub use mobile_no::{deserialize_mobile_no, MobileNo};
