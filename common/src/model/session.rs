//! Per-session context and the state machine that drives the single view.
//!
//! A session moves between four pages: login, table, edit and create. Each
//! named [`Action`] is first checked with [`SessionState::authorize`]; the
//! outcome of the outbound calls it triggers is then folded in with
//! [`SessionState::apply`], which returns the next state without touching
//! the current one.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::record::{
    display_value, object_id, Attributes, ADDRESS, LATITUDE, LONGITUDE,
};
use crate::requests::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Full create, edit and delete access.
    Admin,
    /// Read-only browsing.
    Guest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Login,
    Table,
    Edit,
    Create,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Page::Login => "login",
            Page::Table => "table",
            Page::Edit => "edit",
            Page::Create => "create",
        };
        f.write_str(label)
    }
}

/// Which record form an address or a submission belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Create,
    Edit,
}

impl Flow {
    pub fn page(self) -> Page {
        match self {
            Flow::Create => Page::Create,
            Flow::Edit => Page::Edit,
        }
    }
}

/// In-progress address selection of one form.
///
/// Latitude and longitude are decimal strings and only ever change together
/// with the address, as the result of a successful geocode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAddress {
    pub address: String,
    pub latitude: String,
    pub longitude: String,
}

impl PendingAddress {
    pub fn from_record(record: &Attributes) -> Self {
        let text = |name: &str| record.get(name).map(display_value).unwrap_or_default();
        Self {
            address: text(ADDRESS),
            latitude: text(LATITUDE),
            longitude: text(LONGITUDE),
        }
    }

    pub fn resolved(address: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            address: address.into(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("You are already logged in.")]
    AlreadyAuthenticated,
    #[error("Please log in first.")]
    NotAuthenticated,
    #[error("This action requires admin access.")]
    AdminOnly,
    #[error("This action is not available on the {actual} page.")]
    WrongPage { actual: Page },
}

/// Result of the outbound calls of an action, fed to [`SessionState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    LoggedIn(Tier),
    LoggedOut,
    EditStarted(Attributes),
    CreateStarted,
    WentBack,
    AddressResolved { flow: Flow, address: PendingAddress },
    /// Carries the attributes the dataset accepted.
    RecordUpdated(Attributes),
    RecordCreated,
    RecordDeleted(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub authenticated: bool,
    pub tier: Option<Tier>,
    pub page: Page,
    /// Attributes copied from the table when editing; empty otherwise.
    pub selected_record: Attributes,
    pub object_id: Option<i64>,
    pub create_address: PendingAddress,
    pub edit_address: PendingAddress,
}

impl SessionState {
    pub fn is_admin(&self) -> bool {
        self.authenticated && self.tier == Some(Tier::Admin)
    }

    pub fn pending(&self, flow: Flow) -> &PendingAddress {
        match flow {
            Flow::Create => &self.create_address,
            Flow::Edit => &self.edit_address,
        }
    }

    /// Checks that `action` may run in this state, before anything is called.
    pub fn authorize(&self, action: &Action) -> Result<(), TransitionError> {
        match action {
            Action::Login { .. } => self.require_anonymous(),
            Action::Logout => self.require_authenticated(),
            Action::StartEdit { .. } | Action::StartCreate | Action::Delete { .. } => {
                self.require_admin()?;
                self.require_page(Page::Table)
            }
            Action::Back => self.require_form(),
            Action::SelectSuggestion { flow, .. } | Action::Submit { flow, .. } => {
                self.require_admin()?;
                self.require_page(flow.page())
            }
        }
    }

    pub fn apply(self, event: Event) -> Result<Self, TransitionError> {
        match event {
            Event::LoggedIn(tier) => {
                self.require_anonymous()?;
                Ok(Self {
                    authenticated: true,
                    tier: Some(tier),
                    page: Page::Table,
                    ..Self::default()
                })
            }
            Event::LoggedOut => {
                self.require_authenticated()?;
                Ok(Self::default())
            }
            Event::EditStarted(record) => {
                self.require_admin()?;
                self.require_page(Page::Table)?;
                Ok(Self {
                    page: Page::Edit,
                    object_id: object_id(&record),
                    edit_address: PendingAddress::from_record(&record),
                    selected_record: record,
                    ..self
                })
            }
            Event::CreateStarted => {
                self.require_admin()?;
                self.require_page(Page::Table)?;
                Ok(Self {
                    page: Page::Create,
                    selected_record: Attributes::new(),
                    object_id: None,
                    create_address: PendingAddress::default(),
                    ..self
                })
            }
            Event::WentBack => {
                self.require_form()?;
                Ok(Self {
                    page: Page::Table,
                    ..self
                })
            }
            Event::AddressResolved { flow, address } => {
                self.require_admin()?;
                self.require_page(flow.page())?;
                Ok(match flow {
                    Flow::Create => Self {
                        create_address: address,
                        ..self
                    },
                    Flow::Edit => Self {
                        edit_address: address,
                        ..self
                    },
                })
            }
            Event::RecordUpdated(attributes) => {
                self.require_admin()?;
                self.require_page(Page::Edit)?;
                Ok(Self {
                    edit_address: PendingAddress::from_record(&attributes),
                    selected_record: attributes,
                    ..self
                })
            }
            Event::RecordCreated => {
                self.require_admin()?;
                self.require_page(Page::Create)?;
                Ok(Self {
                    page: Page::Table,
                    selected_record: Attributes::new(),
                    create_address: PendingAddress::default(),
                    ..self
                })
            }
            Event::RecordDeleted(deleted) => {
                self.require_admin()?;
                self.require_page(Page::Table)?;
                if self.object_id == Some(deleted) {
                    Ok(Self {
                        selected_record: Attributes::new(),
                        object_id: None,
                        ..self
                    })
                } else {
                    Ok(self)
                }
            }
        }
    }

    fn require_anonymous(&self) -> Result<(), TransitionError> {
        if self.authenticated {
            Err(TransitionError::AlreadyAuthenticated)
        } else {
            Ok(())
        }
    }

    fn require_authenticated(&self) -> Result<(), TransitionError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(TransitionError::NotAuthenticated)
        }
    }

    fn require_admin(&self) -> Result<(), TransitionError> {
        self.require_authenticated()?;
        if self.tier == Some(Tier::Admin) {
            Ok(())
        } else {
            Err(TransitionError::AdminOnly)
        }
    }

    fn require_page(&self, page: Page) -> Result<(), TransitionError> {
        if self.page == page {
            Ok(())
        } else {
            Err(TransitionError::WrongPage { actual: self.page })
        }
    }

    fn require_form(&self) -> Result<(), TransitionError> {
        self.require_authenticated()?;
        match self.page {
            Page::Edit | Page::Create => Ok(()),
            actual => Err(TransitionError::WrongPage { actual }),
        }
    }
}
