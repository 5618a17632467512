pub mod estimate;
pub mod profile;

pub use estimate::{average, ellipse_circumference, Circumferences, INSUFFICIENT};
pub use profile::ViewProfile;
