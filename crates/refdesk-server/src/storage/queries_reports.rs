//! Reporting and user-administration queries for the Refdesk server.

use refdesk_core::db::{DatabaseError, unix_timestamp};

use super::db::Database;
use super::models::{ArtifactRow, RegistrationWithMatch, ReportRow, User, UserUpdate};

impl Database {
    /// The caller's registrations joined with their matches, newest match
    /// date first.
    pub async fn list_registrations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<RegistrationWithMatch>, DatabaseError> {
        let rows = sqlx::query_as::<_, RegistrationWithMatch>(
            "SELECT i.id, i.match_id, i.role, i.arrival_time, i.notes,
                    i.data_file, i.pdf_file, i.photo_file, i.submitted,
                    p.championship, p.group_name, p.match_date, p.match_number,
                    p.team_a, p.team_b, p.status, p.final_result
             FROM iscrizioni i
             JOIN partite p ON p.id = i.match_id
             WHERE i.user_id = ?
             ORDER BY p.match_date DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Administrative report: matches × registrations × users, ordered by
    /// date, then match number, then surname.
    pub async fn report_rows(&self) -> Result<Vec<ReportRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ReportRow>(
            "SELECT p.id AS match_id, p.championship, p.group_name, p.match_date,
                    p.match_number, p.team_a, p.team_b, p.status, p.final_result,
                    u.first_name, u.last_name, u.email,
                    i.role, i.arrival_time, i.submitted
             FROM partite p
             JOIN iscrizioni i ON i.match_id = p.id
             JOIN users u ON u.id = i.user_id
             ORDER BY p.match_date, p.match_number, u.last_name",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Advanced report input: every registration carrying at least one
    /// submitted artifact, with its match and user.
    pub async fn artifact_rows(&self) -> Result<Vec<ArtifactRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ArtifactRow>(
            "SELECT p.id AS match_id, p.championship, p.match_date, p.match_number,
                    u.first_name, u.last_name,
                    i.role, i.data_file, i.pdf_file, i.photo_file
             FROM partite p
             JOIN iscrizioni i ON i.match_id = p.id
             JOIN users u ON u.id = i.user_id
             WHERE i.data_file IS NOT NULL
                OR i.pdf_file IS NOT NULL
                OR i.photo_file IS NOT NULL
             ORDER BY p.match_date, p.match_number, u.last_name",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    // =========================================================================
    // User administration
    // =========================================================================

    /// List users, optionally filtered by the certification flag.
    pub async fn list_users(
        &self,
        certified_filter: Option<bool>,
    ) -> Result<Vec<User>, DatabaseError> {
        let users = if let Some(certified) = certified_filter {
            sqlx::query_as::<_, User>(
                "SELECT * FROM users WHERE certified = ? ORDER BY last_name, first_name",
            )
            .bind(i64::from(certified))
            .fetch_all(self.pool())
            .await?
        } else {
            sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY last_name, first_name")
                .fetch_all(self.pool())
                .await?
        };

        Ok(users)
    }

    /// Administrative user update; `None` fields are left unchanged.
    pub async fn admin_update_user(
        &self,
        id: &str,
        update: &UserUpdate,
    ) -> Result<(), DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "UPDATE users SET
                first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                tax_code = COALESCE(?, tax_code),
                email = COALESCE(?, email),
                password_hash = COALESCE(?, password_hash),
                role = COALESCE(?, role),
                club = COALESCE(?, club),
                phone = COALESCE(?, phone),
                address = COALESCE(?, address),
                city = COALESCE(?, city),
                certified = COALESCE(?, certified),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(update.first_name.as_deref())
        .bind(update.last_name.as_deref())
        .bind(update.tax_code.as_deref())
        .bind(update.email.as_deref())
        .bind(update.password_hash.as_deref())
        .bind(update.role.as_deref())
        .bind(update.club.as_deref())
        .bind(update.phone.as_deref())
        .bind(update.address.as_deref())
        .bind(update.city.as_deref())
        .bind(update.certified.map(i64::from))
        .bind(now)
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("User {id}")));
        }
        Ok(())
    }

    /// Delete a user; registrations and confirmations cascade.
    pub async fn delete_user(&self, id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
