//! Responsibility-based access gate
//!
//! Decides whether a resolved principal may view or mutate a tender or bid.
//! Tenders are guarded by responsibility for the owning organization. Bids
//! are guarded through the author reference: a user-authored bid is open to
//! anyone sharing an organization with the author, an organization-authored
//! bid to that organization's responsible users.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::identity::IdentityResolver;
use crate::domain::{Bid, BidAuthor, Tender, User};
use crate::error::{ApiError, ApiResult};

pub struct AccessGate<'a> {
    identity: IdentityResolver<'a>,
}

impl<'a> AccessGate<'a> {
    pub fn new(db: &'a PgPool) -> Self {
        Self {
            identity: IdentityResolver::new(db),
        }
    }

    /// The principal must hold a responsibility link to the tender's owning
    /// organization; being the creator is not sufficient.
    pub async fn require_tender_access(&self, user: &User, tender: &Tender) -> ApiResult<()> {
        let link = self
            .identity
            .responsible_link(user.id, tender.organization_id)
            .await?;
        if link.is_none() {
            return Err(ApiError::Forbidden(
                "user does not have access to this tender".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn require_bid_access(&self, user: &User, bid: &Bid) -> ApiResult<()> {
        match bid.author() {
            BidAuthor::User(author_id) => {
                let author_orgs = org_ids(self.identity.responsibilities(author_id).await?);
                let principal_orgs = org_ids(self.identity.responsibilities(user.id).await?);
                if !shares_organization(&author_orgs, &principal_orgs) {
                    return Err(ApiError::Forbidden(
                        "user does not have access to this bid".to_string(),
                    ));
                }
                Ok(())
            }
            BidAuthor::Organization(organization_id) => {
                let link = self
                    .identity
                    .responsible_link(user.id, organization_id)
                    .await?;
                if link.is_none() {
                    return Err(ApiError::Forbidden(
                        "user does not have access to this bid".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

fn org_ids(links: Vec<crate::domain::OrganizationResponsible>) -> Vec<Uuid> {
    links.into_iter().map(|link| link.organization_id).collect()
}

/// Principal and author must both be responsible somewhere, for at least one
/// common organization.
fn shares_organization(author_orgs: &[Uuid], principal_orgs: &[Uuid]) -> bool {
    principal_orgs.iter().any(|org| author_orgs.contains(org))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_links_on_either_side_denies() {
        let org = Uuid::new_v4();
        assert!(!shares_organization(&[], &[]));
        assert!(!shares_organization(&[org], &[]));
        assert!(!shares_organization(&[], &[org]));
    }

    #[test]
    fn disjoint_organizations_deny() {
        assert!(!shares_organization(&[Uuid::new_v4()], &[Uuid::new_v4()]));
    }

    #[test]
    fn any_shared_organization_allows() {
        let shared = Uuid::new_v4();
        assert!(shares_organization(&[shared], &[shared]));
        assert!(shares_organization(
            &[Uuid::new_v4(), shared],
            &[shared, Uuid::new_v4()]
        ));
    }
}
