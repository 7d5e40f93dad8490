//! Capabilities derived from a user's hierarchy tier.

use entity::sea_orm_active_enums::Hierarchy;

use crate::server::model::db::UserModel;

/// Role checks shared by every service.
///
/// `Hierarchy` is ordered from PADRAO up to SUPERADMIN, so "X or above" checks are plain
/// comparisons.
pub trait UserPermissions {
    fn hierarchy(&self) -> Hierarchy;

    fn is_superadmin(&self) -> bool {
        self.hierarchy() == Hierarchy::Superadmin
    }

    fn is_at_least(&self, tier: Hierarchy) -> bool {
        self.hierarchy() >= tier
    }

    fn can_manage_users(&self) -> bool {
        self.is_at_least(Hierarchy::Supervisor)
    }

    fn can_manage_prizes(&self) -> bool {
        self.is_at_least(Hierarchy::Supervisor)
    }

    fn can_manage_credits(&self) -> bool {
        self.is_at_least(Hierarchy::Supervisor)
    }

    fn can_view_all_tickets(&self) -> bool {
        self.is_at_least(Hierarchy::Administrativo)
    }

    fn can_view_sector_tickets(&self) -> bool {
        self.is_at_least(Hierarchy::Supervisor)
    }
}

impl UserPermissions for UserModel {
    fn hierarchy(&self) -> Hierarchy {
        self.hierarchy
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use entity::sea_orm_active_enums::Hierarchy;

    use super::UserPermissions;
    use crate::server::model::db::UserModel;

    fn user(hierarchy: Hierarchy) -> UserModel {
        let now = Utc::now().naive_utc();

        UserModel {
            id: 1,
            email: "user@example.com".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: String::new(),
            hierarchy,
            sector_id: None,
            balance_cents: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Expect the hierarchy to order PADRAO < SUPERVISOR < ADMINISTRATIVO < SUPERADMIN
    #[test]
    fn hierarchy_is_ordered() {
        assert!(Hierarchy::Padrao < Hierarchy::Supervisor);
        assert!(Hierarchy::Supervisor < Hierarchy::Administrativo);
        assert!(Hierarchy::Administrativo < Hierarchy::Superadmin);
    }

    /// Expect management capabilities to start at SUPERVISOR
    #[test]
    fn management_starts_at_supervisor() {
        assert!(!user(Hierarchy::Padrao).can_manage_users());
        assert!(!user(Hierarchy::Padrao).can_manage_credits());

        for tier in [
            Hierarchy::Supervisor,
            Hierarchy::Administrativo,
            Hierarchy::Superadmin,
        ] {
            let user = user(tier);
            assert!(user.can_manage_users());
            assert!(user.can_manage_prizes());
            assert!(user.can_manage_credits());
            assert!(user.can_view_sector_tickets());
        }
    }

    /// Expect only ADMINISTRATIVO and SUPERADMIN to see every ticket
    #[test]
    fn view_all_tickets_starts_at_administrativo() {
        assert!(!user(Hierarchy::Supervisor).can_view_all_tickets());
        assert!(user(Hierarchy::Administrativo).can_view_all_tickets());
        assert!(user(Hierarchy::Superadmin).can_view_all_tickets());
    }

    /// Expect is_superadmin to hold for SUPERADMIN alone
    #[test]
    fn superadmin_is_exclusive() {
        assert!(user(Hierarchy::Superadmin).is_superadmin());
        assert!(!user(Hierarchy::Administrativo).is_superadmin());
    }
}
