pub mod constant;
pub mod fixtures;
pub mod setup;

pub use setup::TestSetup;

pub mod prelude {
    pub use crate::{
        constant::*,
        fixtures::{
            auth::factory as auth_factory, dataset::factory as dataset_factory,
            geostore::factory as geostore_factory,
        },
        TestSetup,
    };
}
