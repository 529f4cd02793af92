use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::{enums::Role, Professor, Student};
use crate::error::{require_name, Result};

/// Common identity shared by everyone stored in the records.
pub trait Person {
    fn id(&self) -> u32;
    fn first_name(&self) -> &str;
    fn last_name(&self) -> &str;

    fn full_name(&self) -> String {
        format!("{} {}", self.first_name(), self.last_name())
    }
}

/// Login and contact details of a person.
///
/// Two users are the same user when their usernames match, whatever their id,
/// email or role.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    id: u32,
    first_name: String,
    last_name: String,
    username: String,
    password: String,
    email: String,
    role: Role,
}

impl User {
    pub(crate) fn new(
        id: u32,
        first_name: String,
        last_name: String,
        username: String,
        password: String,
        email: String,
        role: Role,
    ) -> Result<Self> {
        require_name("first name", &first_name)?;
        require_name("last name", &last_name)?;
        require_name("username", &username)?;

        Ok(Self {
            id,
            first_name,
            last_name,
            username,
            password,
            email,
            role,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl Person for User {
    fn id(&self) -> u32 {
        self.id
    }

    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.username.hash(state);
    }
}

/// Either kind of member, borrowed from the records.
#[derive(Clone, Copy, Debug)]
pub enum Member<'a> {
    Professor(&'a Professor),
    Student(&'a Student),
}

impl<'a> Member<'a> {
    pub fn user(&self) -> &'a User {
        match *self {
            Member::Professor(p) => p.user(),
            Member::Student(s) => s.user(),
        }
    }

    pub fn role(&self) -> Role {
        self.user().role()
    }
}

impl Person for Member<'_> {
    fn id(&self) -> u32 {
        self.user().id()
    }

    fn first_name(&self) -> &str {
        self.user().first_name()
    }

    fn last_name(&self) -> &str {
        self.user().last_name()
    }
}
