//! Member registry.
//!
//! A member is composed with a [`Contact`]: the member record holds the
//! library card number and a required link to the contact that carries the
//! person's name, email and address data. Deleting the contact deletes the
//! member; deleting the member leaves the contact in place. Neither is
//! allowed while the member still has checkouts.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::Book;
use crate::checkout::Checkout;
use crate::error::{LibraryError, LibraryResult};
use crate::model::{Filter, ModelStore, ModelsExt, Query, Versioned};
use crate::notify::{MessageTarget, MessagingSink};
use crate::partner::Contact;
use crate::Model;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "members")]
pub struct Member {
    pub id: String,
    #[model(relation = "contacts")]
    pub partner_id: String,
    pub card_number: Option<String>,
}

/// A member together with its contact.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MemberProfile {
    pub member: Member,
    pub contact: Contact,
}

impl MemberProfile {
    pub fn id(&self) -> &str {
        &self.member.id
    }

    pub fn name(&self) -> &str {
        &self.contact.name
    }

    pub fn email(&self) -> Option<&str> {
        self.contact.email.as_deref()
    }

    pub fn card_number(&self) -> Option<&str> {
        self.member.card_number.as_deref()
    }
}

/// Registration data. With `partner_id` set, the member links to that
/// existing contact and the contact fields are ignored; otherwise a new
/// contact is created from them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewMember {
    pub partner_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country_id: Option<String>,
    pub card_number: Option<String>,
}

impl NewMember {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Changes to a member. Contact fields are written to the linked contact.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MemberChanges {
    pub card_number: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country_id: Option<String>,
}

impl MemberChanges {
    fn touches_contact(&self) -> bool {
        self.name.is_some() || self.email.is_some() || self.phone.is_some() || self.country_id.is_some()
    }
}

pub struct MemberRegistry<'a, S> {
    store: &'a S,
}

impl<'a, S: ModelStore> MemberRegistry<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn create(&self, new: NewMember) -> LibraryResult<MemberProfile> {
        self.store.transaction(|| -> LibraryResult<MemberProfile> {
            let contact = match new.partner_id.as_deref() {
                Some(partner_id) => self.contact(partner_id)?.data,
                None => {
                    if new.name.trim().is_empty() {
                        return Err(LibraryError::validation("A member name is required."));
                    }
                    let contact = Contact {
                        email: new.email.clone(),
                        phone: new.phone.clone(),
                        country_id: new.country_id.clone(),
                        ..Contact::new(new.name.clone())
                    };
                    self.store.models::<Contact>().insert(&contact)?;
                    contact
                }
            };

            let member = Member {
                id: uuid::Uuid::new_v4().to_string(),
                partner_id: contact.id.clone(),
                card_number: new.card_number.clone(),
            };
            self.store.models::<Member>().insert(&member)?;

            info!(member_id = %member.id, partner_id = %contact.id, "member registered");
            Ok(MemberProfile { member, contact })
        })
    }

    pub fn get(&self, id: &str) -> LibraryResult<MemberProfile> {
        let member = self.member(id)?.data;
        let contact = self.contact(&member.partner_id)?.data;
        Ok(MemberProfile { member, contact })
    }

    pub fn exists(&self, id: &str) -> LibraryResult<bool> {
        Ok(self.store.models::<Member>().exists(id)?)
    }

    pub fn find_by_card(&self, card_number: &str) -> LibraryResult<Option<MemberProfile>> {
        let query = Query::filter(Filter::new().eq("card_number", card_number)).limit(1);
        match self.store.models::<Member>().query(&query)?.into_iter().next() {
            Some(found) => self.get(&found.data.id).map(Some),
            None => Ok(None),
        }
    }

    pub fn update(&self, id: &str, changes: MemberChanges) -> LibraryResult<MemberProfile> {
        self.store.transaction(|| -> LibraryResult<MemberProfile> {
            let Versioned {
                data: mut member,
                version,
            } = self.member(id)?;

            if let Some(card_number) = changes.card_number.clone() {
                member.card_number = Some(card_number);
                self.store.models::<Member>().update(&member, version)?;
            }

            let mut contact = self.contact(&member.partner_id)?;
            if changes.touches_contact() {
                if let Some(name) = changes.name.clone() {
                    contact.data.name = name;
                }
                if let Some(email) = changes.email.clone() {
                    contact.data.email = Some(email);
                }
                if let Some(phone) = changes.phone.clone() {
                    contact.data.phone = Some(phone);
                }
                if let Some(country_id) = changes.country_id.clone() {
                    contact.data.country_id = Some(country_id);
                }
                self.store
                    .models::<Contact>()
                    .update(&contact.data, contact.version)?;
            }

            Ok(MemberProfile {
                member,
                contact: contact.data,
            })
        })
    }

    /// Delete the member record only. Refused while checkouts reference it.
    pub fn delete(&self, id: &str) -> LibraryResult<bool> {
        self.store.transaction(|| -> LibraryResult<bool> {
            self.ensure_no_checkouts(id)?;
            Ok(self.store.models::<Member>().delete(id)?)
        })
    }

    /// Delete a contact and, by cascade, every member linked to it.
    /// Refused while any of those members has checkouts. Books published or
    /// written by the contact lose the reference. Returns the number of
    /// members removed.
    pub fn delete_contact(&self, partner_id: &str) -> LibraryResult<usize> {
        self.store.transaction(|| -> LibraryResult<usize> {
            let linked = self
                .store
                .models::<Member>()
                .find_records(&|m| m.partner_id == partner_id)?;
            for member in &linked {
                self.ensure_no_checkouts(&member.id)?;
            }
            for member in &linked {
                self.store.models::<Member>().delete(&member.id)?;
            }
            let books = self.detach_books(partner_id)?;
            if !self.store.models::<Contact>().delete(partner_id)? {
                return Err(LibraryError::not_found::<Contact>(partner_id));
            }

            info!(partner_id, members = linked.len(), books, "contact deleted");
            Ok(linked.len())
        })
    }

    /// Post a message to the member's discussion thread.
    pub fn post_message(
        &self,
        sink: &dyn MessagingSink,
        id: &str,
        subject: Option<&str>,
        body: &str,
        channel: &str,
    ) -> LibraryResult<()> {
        let member = self.member(id)?;
        sink.post(
            &MessageTarget::of::<Member>(&member.data.id),
            subject,
            body,
            channel,
        )?;
        Ok(())
    }

    fn ensure_no_checkouts(&self, member_id: &str) -> LibraryResult<()> {
        if self
            .store
            .models::<Checkout>()
            .any(&|c| c.member_id == member_id)?
        {
            return Err(LibraryError::validation(
                "This member has checkouts and cannot be deleted.",
            ));
        }
        Ok(())
    }

    /// Clear `partner_id` from the publisher and authors of every book.
    fn detach_books(&self, partner_id: &str) -> LibraryResult<usize> {
        let books = self.store.models::<Book>().find(&|b| {
            b.publisher_id.as_deref() == Some(partner_id)
                || b.author_ids.iter().any(|a| a == partner_id)
        })?;
        for Versioned { data: mut book, version } in books.iter().cloned() {
            if book.publisher_id.as_deref() == Some(partner_id) {
                book.publisher_id = None;
            }
            book.author_ids.retain(|a| a != partner_id);
            self.store.models::<Book>().update(&book, version)?;
        }
        Ok(books.len())
    }

    fn member(&self, id: &str) -> LibraryResult<Versioned<Member>> {
        Ok(self.store.models::<Member>().fetch(id)?)
    }

    fn contact(&self, id: &str) -> LibraryResult<Versioned<Contact>> {
        Ok(self.store.models::<Contact>().fetch(id)?)
    }
}
