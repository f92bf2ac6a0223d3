use crate::TestSetup;

pub mod factory;
pub mod mockito;

impl TestSetup {
    pub fn geostore<'a>(&'a mut self) -> GeostoreFixtures<'a> {
        GeostoreFixtures { setup: self }
    }
}

pub struct GeostoreFixtures<'a> {
    pub setup: &'a mut TestSetup,
}
