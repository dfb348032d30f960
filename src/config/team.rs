// src/config/team.rs
use serde::{Serialize, Deserialize};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    Developer,
    Qa,
    ProjectManager,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Developer, Role::Qa, Role::ProjectManager];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Developer => "developer",
            Role::Qa => "QA",
            Role::ProjectManager => "PM",
        }
    }

    /// Inclusive headcount bounds accepted for the role.
    pub fn headcount_range(&self) -> (u32, u32) {
        match self {
            Role::Developer | Role::Qa => (1, 4),
            Role::ProjectManager => (0, 2),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RoleStaffing {
    pub daily_rate: f64,
    pub headcount: u32,
}

impl RoleStaffing {
    pub fn new(daily_rate: f64, headcount: u32) -> Self {
        Self { daily_rate, headcount }
    }

    /// Labor cost of this role over `days` work-days.
    pub fn cost_over(&self, days: f64) -> f64 {
        self.headcount as f64 * self.daily_rate * days
    }

    fn validate(&self, role: Role) -> Result<(), ConfigError> {
        if !self.daily_rate.is_finite() || self.daily_rate < 0.0 {
            return Err(ConfigError::InvalidRate {
                role: role.label(),
                value: self.daily_rate,
            });
        }

        let (min, max) = role.headcount_range();
        if self.headcount < min || self.headcount > max {
            return Err(ConfigError::HeadcountOutOfRange {
                role: role.label(),
                count: self.headcount,
                min,
                max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TeamConfig {
    pub developer: RoleStaffing,
    pub qa: RoleStaffing,
    pub project_manager: RoleStaffing,
}

impl TeamConfig {
    pub fn staffing(&self, role: Role) -> &RoleStaffing {
        match role {
            Role::Developer => &self.developer,
            Role::Qa => &self.qa,
            Role::ProjectManager => &self.project_manager,
        }
    }

    /// Sum of every role's labor cost over `days` work-days.
    pub fn labor_cost(&self, days: f64) -> f64 {
        Role::ALL.iter()
            .map(|role| self.staffing(*role).cost_over(days))
            .sum()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for role in Role::ALL {
            self.staffing(role).validate(role)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team() -> TeamConfig {
        TeamConfig {
            developer: RoleStaffing::new(400.0, 2),
            qa: RoleStaffing::new(350.0, 2),
            project_manager: RoleStaffing::new(500.0, 1),
        }
    }

    #[test]
    fn labor_cost_sums_every_role() {
        assert_eq!(team().labor_cost(250.0), 500_000.0);
        assert_eq!(team().labor_cost(0.0), 0.0);
    }

    #[test]
    fn pm_headcount_may_be_zero_but_developers_may_not() {
        let mut t = team();
        t.project_manager.headcount = 0;
        assert!(t.validate().is_ok());

        t.developer.headcount = 0;
        assert_eq!(
            t.validate(),
            Err(ConfigError::HeadcountOutOfRange { role: "developer", count: 0, min: 1, max: 4 })
        );
    }

    #[test]
    fn rejects_negative_and_nan_rates() {
        let mut t = team();
        t.qa.daily_rate = -1.0;
        assert!(matches!(t.validate(), Err(ConfigError::InvalidRate { role: "QA", .. })));

        t.qa.daily_rate = f64::NAN;
        assert!(t.validate().is_err());
    }
}
