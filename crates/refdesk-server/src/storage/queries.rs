//! Database queries for the Refdesk server.

use refdesk_core::db::{DatabaseError, unix_timestamp};

use super::db::Database;
use super::models::{
    Match, NewMatch, ProfileUpdate, Registration, Session, SubmissionUpdate, User,
    ViewingConfirmation,
};

impl Database {
    // =========================================================================
    // User queries
    // =========================================================================

    /// Create a new user with the default `user` role.
    ///
    /// Inserting an email that already exists is a silent no-op; the return
    /// value is `true` only when a row was actually inserted.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_user(
        &self,
        id: &str,
        first_name: &str,
        last_name: &str,
        tax_code: &str,
        email: &str,
        password_hash: &str,
        club: Option<&str>,
    ) -> Result<bool, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "INSERT INTO users (id, first_name, last_name, tax_code, email, password_hash, club, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(tax_code)
        .bind(email)
        .bind(password_hash)
        .bind(club)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {id}")))
    }

    /// Get a user by email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User with email {email}")))
    }

    /// Update a user's own profile fields. `None` fields are left unchanged.
    pub async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<(), DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "UPDATE users SET
                first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                tax_code = COALESCE(?, tax_code),
                club = COALESCE(?, club),
                phone = COALESCE(?, phone),
                address = COALESCE(?, address),
                city = COALESCE(?, city),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(update.first_name.as_deref())
        .bind(update.last_name.as_deref())
        .bind(update.tax_code.as_deref())
        .bind(update.club.as_deref())
        .bind(update.phone.as_deref())
        .bind(update.address.as_deref())
        .bind(update.city.as_deref())
        .bind(now)
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("User {id}")));
        }
        Ok(())
    }

    // =========================================================================
    // Session queries
    // =========================================================================

    /// Store a session token hash.
    pub async fn create_session(
        &self,
        id: &str,
        user_id: &str,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<Session, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_session(id).await
    }

    /// Get a session by ID.
    pub async fn get_session(&self, id: &str) -> Result<Session, DatabaseError> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Session {id}")))
    }

    /// Find a live (non-revoked, non-expired) session by token hash.
    pub async fn get_session_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, DatabaseError> {
        let now = unix_timestamp();

        let session = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE token_hash = ? AND revoked = 0 AND expires_at > ?",
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(self.pool())
        .await?;

        Ok(session)
    }

    /// Revoke the session presenting the given token hash.
    pub async fn revoke_session_by_hash(&self, token_hash: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE sessions SET revoked = 1 WHERE token_hash = ?")
            .bind(token_hash)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Match queries
    // =========================================================================

    /// Insert a match with status `to_be_played`.
    pub async fn create_match(&self, id: &str, new: &NewMatch) -> Result<Match, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO partite (id, championship, group_name, match_date, match_number, team_a, team_b, venue, kickoff_time, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&new.championship)
        .bind(new.group_name.as_deref())
        .bind(&new.match_date)
        .bind(&new.match_number)
        .bind(&new.team_a)
        .bind(&new.team_b)
        .bind(new.venue.as_deref())
        .bind(new.kickoff_time.as_deref())
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_match(id).await
    }

    /// Get a match by ID.
    pub async fn get_match(&self, id: &str) -> Result<Match, DatabaseError> {
        sqlx::query_as::<_, Match>("SELECT * FROM partite WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Match {id}")))
    }

    /// List all matches ordered by ascending scheduled date.
    pub async fn list_matches(&self) -> Result<Vec<Match>, DatabaseError> {
        let matches =
            sqlx::query_as::<_, Match>("SELECT * FROM partite ORDER BY match_date ASC")
                .fetch_all(self.pool())
                .await?;

        Ok(matches)
    }

    /// Advance `to_be_played` to `in_progress`.
    ///
    /// Guarded by the status-equality predicate, so concurrent caller
    /// registrations race harmlessly; returns `true` only for the
    /// registration that actually flipped the status.
    pub async fn set_match_started(&self, id: &str) -> Result<bool, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "UPDATE partite SET status = 'in_progress', updated_at = ? WHERE id = ? AND status = 'to_be_played'",
        )
        .bind(now)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark a match completed and store its final result.
    pub async fn complete_match(&self, id: &str, final_result: &str) -> Result<(), DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "UPDATE partite SET status = 'completed', final_result = ?, updated_at = ? WHERE id = ?",
        )
        .bind(final_result)
        .bind(now)
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Match {id}")));
        }
        Ok(())
    }

    /// Unconditional administrator status override.
    pub async fn override_match_status(
        &self,
        id: &str,
        status: &str,
        admin_note: Option<&str>,
    ) -> Result<bool, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "UPDATE partite SET status = ?, admin_note = COALESCE(?, admin_note), updated_at = ? WHERE id = ?",
        )
        .bind(status)
        .bind(admin_note)
        .bind(now)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Registration queries
    // =========================================================================

    /// Register a user for a match.
    ///
    /// At most one registration exists per (user, match); a repeat call
    /// updates role and arrival time on the existing row.
    pub async fn upsert_registration(
        &self,
        id: &str,
        user_id: &str,
        match_id: &str,
        role: &str,
        arrival_time: &str,
    ) -> Result<Registration, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO iscrizioni (id, user_id, match_id, role, arrival_time, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (user_id, match_id) DO UPDATE SET
                role = excluded.role,
                arrival_time = excluded.arrival_time,
                updated_at = excluded.updated_at",
        )
        .bind(id)
        .bind(user_id)
        .bind(match_id)
        .bind(role)
        .bind(arrival_time)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_registration_for(user_id, match_id).await
    }

    /// Get a registration by ID.
    pub async fn get_registration(&self, id: &str) -> Result<Registration, DatabaseError> {
        sqlx::query_as::<_, Registration>("SELECT * FROM iscrizioni WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Registration {id}")))
    }

    /// Get the registration of a user on a match.
    pub async fn get_registration_for(
        &self,
        user_id: &str,
        match_id: &str,
    ) -> Result<Registration, DatabaseError> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM iscrizioni WHERE user_id = ? AND match_id = ?",
        )
        .bind(user_id)
        .bind(match_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| {
            DatabaseError::NotFound(format!("Registration of user {user_id} on match {match_id}"))
        })
    }

    /// Apply an end-of-match submission to a registration.
    ///
    /// `None` fields keep their stored value; the submitted flag is set
    /// either way.
    pub async fn apply_submission(
        &self,
        registration_id: &str,
        update: &SubmissionUpdate,
    ) -> Result<(), DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "UPDATE iscrizioni SET
                notes = COALESCE(?, notes),
                data_file = COALESCE(?, data_file),
                pdf_file = COALESCE(?, pdf_file),
                photo_file = COALESCE(?, photo_file),
                submitted = 1,
                updated_at = ?
             WHERE id = ?",
        )
        .bind(update.notes.as_deref())
        .bind(update.data_file.as_deref())
        .bind(update.pdf_file.as_deref())
        .bind(update.photo_file.as_deref())
        .bind(now)
        .bind(registration_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Registration {registration_id}"
            )));
        }
        Ok(())
    }

    /// Unconditional administrator role override.
    pub async fn update_registration_role(
        &self,
        id: &str,
        role: &str,
    ) -> Result<bool, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query("UPDATE iscrizioni SET role = ?, updated_at = ? WHERE id = ?")
            .bind(role)
            .bind(now)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Viewing-confirmation queries
    // =========================================================================

    /// Record that a user has viewed a match. Repeat confirmation is a no-op.
    pub async fn confirm_viewing(
        &self,
        match_id: &str,
        user_id: &str,
    ) -> Result<(), DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO partite_visualizzazioni (match_id, user_id, confirmed_at)
             VALUES (?, ?, ?)
             ON CONFLICT (match_id, user_id) DO NOTHING",
        )
        .bind(match_id)
        .bind(user_id)
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// List all viewing confirmations.
    pub async fn list_viewings(&self) -> Result<Vec<ViewingConfirmation>, DatabaseError> {
        let viewings = sqlx::query_as::<_, ViewingConfirmation>(
            "SELECT * FROM partite_visualizzazioni",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(viewings)
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Delete all registrations, viewing confirmations, and matches —
    /// children before parents for the foreign-key dependency.
    ///
    /// Returns (registrations deleted, matches deleted).
    pub async fn reset_matches(&self) -> Result<(u64, u64), DatabaseError> {
        let registrations = sqlx::query("DELETE FROM iscrizioni")
            .execute(self.pool())
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM partite_visualizzazioni")
            .execute(self.pool())
            .await?;

        let matches = sqlx::query("DELETE FROM partite")
            .execute(self.pool())
            .await?
            .rows_affected();

        Ok((registrations, matches))
    }
}
