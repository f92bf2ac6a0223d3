use crate::TestSetup;

pub mod factory;
pub mod mockito;

impl TestSetup {
    pub fn dataset<'a>(&'a mut self) -> DatasetFixtures<'a> {
        DatasetFixtures { setup: self }
    }
}

pub struct DatasetFixtures<'a> {
    pub setup: &'a mut TestSetup,
}
