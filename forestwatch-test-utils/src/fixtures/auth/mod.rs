use crate::TestSetup;

pub mod factory;
pub mod mockito;

impl TestSetup {
    pub fn auth<'a>(&'a mut self) -> AuthFixtures<'a> {
        AuthFixtures { setup: self }
    }
}

pub struct AuthFixtures<'a> {
    pub setup: &'a mut TestSetup,
}
