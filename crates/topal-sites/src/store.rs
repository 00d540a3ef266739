//! Site persistence

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};

use topal_storage::Database;

use crate::error::SiteError;
use crate::owner::OwnerId;
use crate::site::{NewSite, Site};
use crate::Result;

const SITE_COLUMNS: &str =
    "id, domain, tld, full_domain, title, html_content, created_at, updated_at, owner_id";

/// Record store for deployed sites.
pub trait SiteStore: Send + Sync {
    /// Look up the site published at a canonical address.
    fn find_by_address(&self, address: &str) -> Result<Option<Site>>;

    /// Publish a new site. Fails with [`SiteError::DomainTaken`] if the address is in use.
    fn create(&self, new_site: NewSite) -> Result<Site>;

    /// Delete a site if `owner` deployed it. Returns whether a row was removed.
    fn delete(&self, id: &str, owner: &OwnerId) -> Result<bool>;

    /// All sites deployed by `owner`, newest first.
    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Site>>;

    /// Sites deployed by `owner` whose address or title contains `query`, newest first.
    fn search_by_owner(&self, owner: &OwnerId, query: &str, limit: usize) -> Result<Vec<Site>>;
}

#[derive(Clone)]
pub struct SqliteSiteStore {
    db: Database,
}

impl SqliteSiteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Make `%`, `_` and `\` match literally in a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn site_from_row(row: &Row<'_>) -> rusqlite::Result<Site> {
    let created_str: String = row.get(6)?;
    let updated_str: String = row.get(7)?;

    Ok(Site {
        id: row.get(0)?,
        domain: row.get(1)?,
        tld: row.get(2)?,
        full_domain: row.get(3)?,
        title: row.get(4)?,
        html_content: row.get(5)?,
        created_at: parse_timestamp(&created_str),
        updated_at: parse_timestamp(&updated_str),
        owner_id: row.get(8)?,
    })
}

impl SiteStore for SqliteSiteStore {
    fn find_by_address(&self, address: &str) -> Result<Option<Site>> {
        Ok(self.db.with_connection(|conn| {
            let site = conn
                .query_row(
                    &format!("SELECT {SITE_COLUMNS} FROM sites WHERE full_domain = ?1"),
                    [address],
                    site_from_row,
                )
                .optional()?;
            Ok(site)
        })?)
    }

    fn create(&self, new_site: NewSite) -> Result<Site> {
        new_site.validate()?;
        let site = new_site.into_site();

        let inserted = self.db.with_connection(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO sites ({SITE_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ),
                rusqlite::params![
                    site.id,
                    site.domain,
                    site.tld,
                    site.full_domain,
                    site.title,
                    site.html_content,
                    site.created_at.to_rfc3339(),
                    site.updated_at.to_rfc3339(),
                    site.owner_id,
                ],
            )?;
            Ok(())
        });

        match inserted {
            Ok(()) => {}
            Err(e) if e.is_unique_violation() => {
                return Err(SiteError::DomainTaken(site.full_domain));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            site_id = %site.id,
            address = %site.full_domain,
            "Deployed site"
        );

        Ok(site)
    }

    fn delete(&self, id: &str, owner: &OwnerId) -> Result<bool> {
        let removed = self.db.with_connection(|conn| {
            let count = conn.execute(
                "DELETE FROM sites WHERE id = ?1 AND owner_id = ?2",
                rusqlite::params![id, owner.as_str()],
            )?;
            Ok(count)
        })?;

        tracing::info!(site_id = %id, removed, "Deleted site");

        Ok(removed > 0)
    }

    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Site>> {
        Ok(self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SITE_COLUMNS} FROM sites
                 WHERE owner_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;

            let sites = stmt
                .query_map([owner.as_str()], site_from_row)?
                .collect::<rusqlite::Result<Vec<Site>>>()?;

            Ok(sites)
        })?)
    }

    fn search_by_owner(&self, owner: &OwnerId, query: &str, limit: usize) -> Result<Vec<Site>> {
        Ok(self.db.with_connection(|conn| {
            let pattern = format!("%{}%", escape_like(&query.trim().to_lowercase()));

            let mut stmt = conn.prepare(&format!(
                "SELECT {SITE_COLUMNS} FROM sites
                 WHERE owner_id = ?1
                   AND (LOWER(full_domain) LIKE ?2 ESCAPE '\\' OR LOWER(title) LIKE ?2 ESCAPE '\\')
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?3"
            ))?;

            let sites = stmt
                .query_map(
                    rusqlite::params![owner.as_str(), pattern, limit as i64],
                    site_from_row,
                )?
                .collect::<rusqlite::Result<Vec<Site>>>()?;

            Ok(sites)
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topal_navigation::ValidationError;

    fn store() -> SqliteSiteStore {
        SqliteSiteStore::new(Database::open_in_memory().unwrap())
    }

    fn owner(name: &str) -> OwnerId {
        OwnerId::from(name.to_string())
    }

    fn deploy(store: &SqliteSiteStore, domain: &str, tld: &str, who: &str) -> Site {
        store
            .create(NewSite::new(
                domain,
                tld,
                format!("{domain} title"),
                "<p>hello</p>",
                owner(who),
            ))
            .unwrap()
    }

    #[test]
    fn test_create_and_find() {
        let store = store();
        let site = deploy(&store, "blog", ".topal", "alice");

        let found = store.find_by_address("blog.topal").unwrap().unwrap();
        assert_eq!(found.id, site.id);
        assert_eq!(found.html_content, "<p>hello</p>");
        assert_eq!(found.owner_id, "alice");

        assert!(store.find_by_address("nothing.ab").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_address_is_taken() {
        let store = store();
        deploy(&store, "blog", ".topal", "alice");

        let err = store
            .create(NewSite::new("blog", ".topal", "Other", "<p/>", owner("bob")))
            .unwrap_err();
        assert!(matches!(err, SiteError::DomainTaken(ref a) if a == "blog.topal"));

        // Same name under another TLD is a different address
        deploy(&store, "blog", ".ab", "bob");
    }

    #[test]
    fn test_create_validates() {
        let store = store();
        let err = store
            .create(NewSite::new("b1og", ".topal", "t", "c", owner("alice")))
            .unwrap_err();
        assert!(matches!(
            err,
            SiteError::Validation(ValidationError::InvalidCharacters)
        ));
        assert!(store.list_by_owner(&owner("alice")).unwrap().is_empty());
    }

    #[test]
    fn test_delete_is_owner_scoped() {
        let store = store();
        let site = deploy(&store, "blog", ".topal", "alice");

        assert!(!store.delete(&site.id, &owner("bob")).unwrap());
        assert!(store.find_by_address("blog.topal").unwrap().is_some());

        assert!(store.delete(&site.id, &owner("alice")).unwrap());
        assert!(store.find_by_address("blog.topal").unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let store = store();
        deploy(&store, "one", ".topal", "alice");
        deploy(&store, "two", ".topal", "alice");
        deploy(&store, "three", ".topal", "alice");
        deploy(&store, "other", ".topal", "bob");

        let sites = store.list_by_owner(&owner("alice")).unwrap();
        let addresses: Vec<&str> = sites.iter().map(|s| s.full_domain.as_str()).collect();
        assert_eq!(addresses, ["three.topal", "two.topal", "one.topal"]);
    }

    #[test]
    fn test_search_by_owner() {
        let store = store();
        deploy(&store, "recipes", ".magic", "alice");
        deploy(&store, "music", ".aura", "alice");
        deploy(&store, "recipebook", ".ab", "bob");

        let hits = store.search_by_owner(&owner("alice"), "RECIPE", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_domain, "recipes.magic");

        let hits = store.search_by_owner(&owner("alice"), "title", 1).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let store = store();
        store
            .create(NewSite::new("abc", ".topal", "Plain", "<p/>", owner("alice")))
            .unwrap();
        store
            .create(NewSite::new("sale", ".ab", "50% off_now", "<p/>", owner("alice")))
            .unwrap();

        let alice = owner("alice");
        assert!(store.search_by_owner(&alice, "a_c", 10).unwrap().is_empty());
        assert!(store.search_by_owner(&alice, "\\", 10).unwrap().is_empty());

        let hits = store.search_by_owner(&alice, "%", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_domain, "sale.ab");

        let hits = store.search_by_owner(&alice, "off_now", 10).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_undecodable_row_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteSiteStore::new(db.clone());
        deploy(&store, "good", ".topal", "alice");

        db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO sites (id, domain, tld, full_domain, title, html_content,
                                    created_at, updated_at, owner_id)
                 VALUES ('bad', 'bad', '.topal', 'bad.topal', X'00FF', '', '', '', 'alice')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        assert!(matches!(
            store.list_by_owner(&owner("alice")),
            Err(SiteError::Storage(_))
        ));
        assert!(store.search_by_owner(&owner("alice"), "", 10).is_err());
    }
}
