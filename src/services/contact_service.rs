//! services/contact_service.rs
//! CRUD des contacts marketing (table `contacts`).

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

use crate::models::contact_model::{Contact, CreateContactRequest};

#[derive(Clone)]
pub struct ContactService {
    db_pool: Pool<Sqlite>,
}

impl ContactService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        ContactService { db_pool }
    }

    pub async fn create_contact(&self, req: CreateContactRequest) -> Result<Contact> {
        let contact = Contact {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            email: req.email,
            whatsapp: req.whatsapp.filter(|w| !w.is_empty()),
            created_at: Utc::now().to_rfc3339(),
        };

        sqlx::query(
            r#"
            INSERT INTO contacts (id, name, email, whatsapp, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&contact.id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.whatsapp)
        .bind(&contact.created_at)
        .execute(&self.db_pool)
        .await
        .context("Insertion du contact en échec")?;

        Ok(contact)
    }

    pub async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, whatsapp, created_at
            FROM contacts
            ORDER BY created_at ASC
            LIMIT 1000
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .context("Lecture des contacts en échec")?;

        Ok(rows
            .into_iter()
            .map(|row| Contact {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
                whatsapp: row.get("whatsapp"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    pub async fn delete_contact(&self, contact_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM contacts WHERE id = ?1")
            .bind(contact_id)
            .execute(&self.db_pool)
            .await
            .context("Suppression du contact en échec")?;
        Ok(())
    }
}
