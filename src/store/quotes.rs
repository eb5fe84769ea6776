use sqlx::{Connection, QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::quotes::{validate_user_id, NewQuote, Quote, QuoteChange, QuoteFilter, QuotePatch},
    store::Store,
};

impl Store {
    #[tracing::instrument(skip(self))]
    pub async fn create_quote(&self, new: NewQuote) -> AppResult<Quote> {
        new.validate()?;

        self.run(move |conn| Box::pin(async move { insert_quote(conn, &new).await }))
            .await
    }

    /// Inserts every quote of the batch in one transaction. Nothing is written
    /// when any entry fails validation or insertion.
    #[tracing::instrument(skip_all, fields(count = batch.len()))]
    pub async fn create_quotes(&self, batch: Vec<NewQuote>) -> AppResult<Vec<Quote>> {
        for (idx, new) in batch.iter().enumerate() {
            new.validate().map_err(|e| match e {
                AppError::Validation(msg) => AppError::validation(format!("quote {idx}: {msg}")),
                other => other,
            })?;
        }

        self.run(move |conn| {
            Box::pin(async move {
                let mut tx = conn.begin().await.inspect_err(
                    |e| tracing::error!(err = ?e, "an error occurred when starting transaction"),
                )?;

                let mut created = Vec::with_capacity(batch.len());
                for new in &batch {
                    created.push(insert_quote(&mut *tx, new).await?);
                }

                tx.commit().await.inspect_err(
                    |e| tracing::error!(err = ?e, "an error occurred when committing quote batch"),
                )?;

                Ok(created)
            })
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_quotes(&self, filter: QuoteFilter) -> AppResult<Vec<Quote>> {
        self.run(move |conn| {
            Box::pin(async move {
                let quotes = sqlx::query_as::<_, Quote>(
                    r#"
                        SELECT
                            q.id AS id,
                            q.text AS text,
                            q.author AS author,
                            q.source AS source,
                            q.category AS category,
                            q.created_at AS created_at,
                            f.id IS NOT NULL AS is_favorite
                        FROM quotes q
                        LEFT JOIN
                            favorites f ON f.quote_id = q.id AND f.user_id = $1
                        WHERE
                            $2 IS NULL OR q.category = $2
                        ORDER BY q.id;
                    "#,
                )
                .bind(filter.user_id.as_deref())
                .bind(filter.category.as_deref())
                .fetch_all(&mut *conn)
                .await
                .inspect_err(
                    |e| tracing::error!(err = ?e, "an error occurred when fetching quotes from database"),
                )?;

                Ok(quotes)
            })
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_quote(&self, id: i64, user_id: Option<String>) -> AppResult<Quote> {
        self.run(move |conn| {
            Box::pin(async move {
                fetch_quote(conn, id, user_id.as_deref())
                    .await?
                    .ok_or_else(|| AppError::not_found("quote not found"))
            })
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_quote(
        &self,
        id: i64,
        patch: QuotePatch,
        user_id: Option<String>,
    ) -> AppResult<Quote> {
        let changes = patch.into_changes()?;

        self.run(move |conn| {
            Box::pin(async move {
                if !quote_exists(conn, id).await? {
                    return Err(AppError::not_found("quote not found"));
                }

                let mut builder = QueryBuilder::<Sqlite>::new("UPDATE quotes SET ");
                {
                    let mut assignments = builder.separated(", ");
                    for change in changes {
                        assignments.push(change.column());
                        assignments.push_unseparated(" = ");
                        match change {
                            QuoteChange::Text(text) => assignments.push_bind_unseparated(text),
                            QuoteChange::Author(author) => assignments.push_bind_unseparated(author),
                            QuoteChange::Source(source) => assignments.push_bind_unseparated(source),
                            QuoteChange::Category(category) => {
                                assignments.push_bind_unseparated(category)
                            }
                        };
                    }
                }
                builder.push(" WHERE id = ").push_bind(id);

                builder
                    .build()
                    .execute(&mut *conn)
                    .await
                    .inspect_err(
                        |e| tracing::error!(err = ?e, id, "an error occurred when updating quote"),
                    )?;

                fetch_quote(conn, id, user_id.as_deref())
                    .await?
                    .ok_or_else(|| AppError::not_found("quote not found"))
            })
        })
        .await
    }

    /// Deletes a quote. Its favorites go with it through `ON DELETE CASCADE`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_quote(&self, id: i64) -> AppResult<()> {
        self.run(move |conn| {
            Box::pin(async move {
                let result = sqlx::query(
                    r#"
                        DELETE FROM quotes
                        WHERE id = $1;
                    "#,
                )
                .bind(id)
                .execute(&mut *conn)
                .await
                .inspect_err(
                    |e| tracing::error!(err = ?e, id, "an error occurred when deleting quote"),
                )?;

                if result.rows_affected() == 0 {
                    return Err(AppError::not_found("quote not found"));
                }

                Ok(())
            })
        })
        .await
    }

    /// Marks a quote as a favorite of `user_id`. Marking it twice is not an error.
    #[tracing::instrument(skip(self))]
    pub async fn set_favorite(&self, quote_id: i64, user_id: String) -> AppResult<()> {
        validate_user_id(&user_id)?;

        self.run(move |conn| {
            Box::pin(async move {
                if !quote_exists(conn, quote_id).await? {
                    return Err(AppError::not_found("quote not found"));
                }

                sqlx::query(
                    r#"
                        INSERT INTO
                            favorites (quote_id, user_id)
                        VALUES
                            ($1, $2)
                        ON CONFLICT (quote_id, user_id)
                        DO NOTHING;
                    "#,
                )
                .bind(quote_id)
                .bind(user_id.as_str())
                .execute(&mut *conn)
                .await
                .inspect_err(|e| {
                    tracing::error!(err = ?e, quote_id, user_id = %user_id, "an error occurred when adding favorite");
                })?;

                Ok(())
            })
        })
        .await
    }

    /// Returns whether a favorite row was actually removed.
    #[tracing::instrument(skip(self))]
    pub async fn clear_favorite(&self, quote_id: i64, user_id: String) -> AppResult<bool> {
        self.run(move |conn| {
            Box::pin(async move {
                let result = sqlx::query(
                    r#"
                        DELETE FROM favorites
                        WHERE quote_id = $1 AND user_id = $2;
                    "#,
                )
                .bind(quote_id)
                .bind(user_id.as_str())
                .execute(&mut *conn)
                .await
                .inspect_err(|e| {
                    tracing::error!(err = ?e, quote_id, user_id = %user_id, "an error occurred when removing favorite");
                })?;

                Ok(result.rows_affected() > 0)
            })
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_favorites(&self, user_id: String) -> AppResult<Vec<Quote>> {
        self.run(move |conn| {
            Box::pin(async move {
                let quotes = sqlx::query_as::<_, Quote>(
                    r#"
                        SELECT
                            q.id AS id,
                            q.text AS text,
                            q.author AS author,
                            q.source AS source,
                            q.category AS category,
                            q.created_at AS created_at,
                            TRUE AS is_favorite
                        FROM quotes q
                        JOIN
                            favorites f ON f.quote_id = q.id
                        WHERE
                            f.user_id = $1
                        ORDER BY f.id;
                    "#,
                )
                .bind(user_id.as_str())
                .fetch_all(&mut *conn)
                .await
                .inspect_err(|e| {
                    tracing::error!(err = ?e, user_id = %user_id, "an error occurred when fetching favorites");
                })?;

                Ok(quotes)
            })
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_categories(&self) -> AppResult<Vec<String>> {
        self.run(|conn| {
            Box::pin(async move {
                let categories = sqlx::query_scalar::<_, String>(
                    r#"
                        SELECT DISTINCT
                            category
                        FROM quotes
                        WHERE category IS NOT NULL
                        ORDER BY category;
                    "#,
                )
                .fetch_all(&mut *conn)
                .await
                .inspect_err(
                    |e| tracing::error!(err = ?e, "an error occurred when fetching categories"),
                )?;

                Ok(categories)
            })
        })
        .await
    }
}

async fn insert_quote(conn: &mut SqliteConnection, new: &NewQuote) -> AppResult<Quote> {
    let quote = sqlx::query_as::<_, Quote>(
        r#"
            INSERT INTO
                quotes (text, author, source, category)
            VALUES
                ($1, $2, $3, $4)
            RETURNING
                id, text, author, source, category, created_at, FALSE AS is_favorite;
        "#,
    )
    .bind(new.text.as_str())
    .bind(new.author.as_str())
    .bind(new.source.as_deref())
    .bind(new.category.as_deref())
    .fetch_one(&mut *conn)
    .await
    .inspect_err(|e| {
        tracing::error!(err = ?e, author = %new.author, "an error occurred when adding quote");
    })?;

    Ok(quote)
}

async fn fetch_quote(
    conn: &mut SqliteConnection,
    id: i64,
    user_id: Option<&str>,
) -> AppResult<Option<Quote>> {
    let quote = sqlx::query_as::<_, Quote>(
        r#"
            SELECT
                q.id AS id,
                q.text AS text,
                q.author AS author,
                q.source AS source,
                q.category AS category,
                q.created_at AS created_at,
                f.id IS NOT NULL AS is_favorite
            FROM quotes q
            LEFT JOIN
                favorites f ON f.quote_id = q.id AND f.user_id = $1
            WHERE
                q.id = $2;
        "#,
    )
    .bind(user_id)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .inspect_err(|e| tracing::error!(err = ?e, id, "an error occurred when fetching quote"))?;

    Ok(quote)
}

async fn quote_exists(conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
            SELECT EXISTS (
                SELECT 1 FROM quotes WHERE id = $1
            );
        "#,
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await
    .inspect_err(|e| tracing::error!(err = ?e, id, "an error occurred when checking quote"))?;

    Ok(exists)
}
