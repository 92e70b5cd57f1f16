use common::model::session::Tier;

/// The two configured access codes.
///
/// Matching is plain, case-sensitive equality. The admin code is checked
/// first, so a code configured for both tiers grants admin.
#[derive(Clone)]
pub struct AccessCodes {
    admin: String,
    guest: String,
}

impl AccessCodes {
    pub fn new(admin: impl Into<String>, guest: impl Into<String>) -> Self {
        Self {
            admin: admin.into(),
            guest: guest.into(),
        }
    }

    pub fn tier_for(&self, code: &str) -> Option<Tier> {
        if code == self.admin {
            Some(Tier::Admin)
        } else if code == self.guest {
            Some(Tier::Guest)
        } else {
            None
        }
    }
}
