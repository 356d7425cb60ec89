//! Compute, port and routing-priority partitioning across tenants
//!
//! A single container instance is shared by every tenant. Each tenant runs an
//! application task and a storage task, so the instance budget is split into
//! `2 * N` shares with floor division. The remainder is left unallocated.

use crate::error::{Result, TemplateError};
use crate::naming::validate_subdomains;
use serde::{Deserialize, Serialize};

/// ECS schedules 1024 cpu units per vCPU
pub const CPU_UNITS_PER_VCPU: u32 = 1024;
/// Usable memory of a t2.micro container instance
pub const INSTANCE_MEMORY_MB: u32 = 992;
pub const DEFAULT_BASE_PORT: u16 = 9000;
/// Highest listener rule priority the load balancer accepts
pub const MAX_ROUTING_PRIORITY: u32 = 50_000;

/// Fixed budget shared by all tenants of one stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeBudget {
    pub total_cpu_units: u32,
    pub total_memory_mb: u32,
    pub base_port: u16,
}

impl Default for ComputeBudget {
    fn default() -> Self {
        Self {
            total_cpu_units: CPU_UNITS_PER_VCPU,
            total_memory_mb: INSTANCE_MEMORY_MB,
            base_port: DEFAULT_BASE_PORT,
        }
    }
}

/// Weight of the application task against the storage task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRatio {
    pub app: u32,
    pub storage: u32,
}

impl SplitRatio {
    pub const EVEN: SplitRatio = SplitRatio { app: 1, storage: 1 };
    pub const APP_WEIGHTED: SplitRatio = SplitRatio { app: 3, storage: 1 };

    fn total(&self) -> u32 {
        self.app + self.storage
    }
}

impl Default for SplitRatio {
    fn default() -> Self {
        Self::EVEN
    }
}

/// Cpu and memory reserved for one container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskShare {
    pub cpu_units: u32,
    pub memory_mb: u32,
}

impl TaskShare {
    /// A container cannot be scheduled with no cpu or no memory
    pub fn is_empty(&self) -> bool {
        self.cpu_units == 0 || self.memory_mb == 0
    }
}

/// One hosted subdomain and the slice of the shared budget it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub subdomain: String,
    pub port: u16,
    pub routing_priority: u32,
    pub app: TaskShare,
    pub storage: TaskShare,
}

impl ComputeBudget {
    /// Even per-task share: `total / (2 * tenants)` for cpu and memory
    pub fn per_task_share(&self, tenants: usize) -> Result<TaskShare> {
        let (app, _) = self.split(tenants, SplitRatio::EVEN)?;
        Ok(app)
    }

    /// Application and storage shares for one tenant under `ratio`.
    ///
    /// The ratio is applied before dividing, so `3:1` over `N` tenants gives the
    /// application `total * 3 / (4 * N)`.
    pub fn split(&self, tenants: usize, ratio: SplitRatio) -> Result<(TaskShare, TaskShare)> {
        if tenants == 0 {
            return Err(TemplateError::NoTenants);
        }

        let n = tenants as u64;
        let weight = ratio.total() as u64;
        let share = |total: u32, part: u32| -> u32 {
            // fits: total * part / (weight * n) <= total
            ((total as u64 * part as u64) / (weight * n)) as u32
        };

        let app = TaskShare {
            cpu_units: share(self.total_cpu_units, ratio.app),
            memory_mb: share(self.total_memory_mb, ratio.app),
        };
        let storage = TaskShare {
            cpu_units: share(self.total_cpu_units, ratio.storage),
            memory_mb: share(self.total_memory_mb, ratio.storage),
        };

        Ok((app, storage))
    }

    /// `base_port + index`
    pub fn port(&self, index: usize) -> Result<u16> {
        u16::try_from(index)
            .ok()
            .and_then(|i| self.base_port.checked_add(i))
            .ok_or(TemplateError::PortSpaceExhausted {
                base_port: self.base_port,
                tenants: index + 1,
            })
    }

    /// Tenants in declaration order with distinct ports and priorities.
    ///
    /// Fails with `BudgetTooSmall` when any share floors to zero.
    pub fn partition(&self, subdomains: &[String], ratio: SplitRatio) -> Result<Vec<Tenant>> {
        validate_subdomains(subdomains)?;
        let (app, storage) = self.split(subdomains.len(), ratio)?;
        if app.is_empty() || storage.is_empty() {
            return Err(TemplateError::BudgetTooSmall {
                cpu_units: self.total_cpu_units,
                memory_mb: self.total_memory_mb,
                tenants: subdomains.len(),
            });
        }

        subdomains
            .iter()
            .enumerate()
            .map(|(index, subdomain)| {
                let port = self.port(index)?;
                Ok(Tenant {
                    subdomain: subdomain.clone(),
                    port,
                    routing_priority: routing_priority(port)?,
                    app,
                    storage,
                })
            })
            .collect()
    }
}

/// Ports are already unique positive integers, so they double as priorities
pub fn routing_priority(port: u16) -> Result<u32> {
    let priority = port as u32;
    if priority == 0 || priority > MAX_ROUTING_PRIORITY {
        return Err(TemplateError::PriorityOutOfRange(priority));
    }
    Ok(priority)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_tenant_scenario() {
        let budget = ComputeBudget {
            total_cpu_units: 1024,
            total_memory_mb: 992,
            base_port: 9000,
        };
        let tenants = budget
            .partition(&names(&["blog", "shop"]), SplitRatio::EVEN)
            .unwrap();

        let ports: Vec<u16> = tenants.iter().map(|t| t.port).collect();
        let priorities: Vec<u32> = tenants.iter().map(|t| t.routing_priority).collect();
        assert_eq!(ports, vec![9000, 9001]);
        assert_eq!(priorities, vec![9000, 9001]);
        for t in &tenants {
            assert_eq!(t.app, TaskShare { cpu_units: 256, memory_mb: 248 });
            assert_eq!(t.storage, t.app);
        }
    }

    #[test]
    fn test_floor_division_never_overallocates() {
        let budget = ComputeBudget {
            total_cpu_units: 1000,
            total_memory_mb: 997,
            base_port: 9000,
        };
        for n in 1..=64usize {
            let share = budget.per_task_share(n).unwrap();
            assert_eq!(share.cpu_units, 1000 / (2 * n as u32));
            assert_eq!(share.memory_mb, 997 / (2 * n as u32));
            assert!(2 * n as u32 * share.cpu_units <= budget.total_cpu_units);
            assert!(2 * n as u32 * share.memory_mb <= budget.total_memory_mb);
            assert!(budget.total_cpu_units - 2 * n as u32 * share.cpu_units < 2 * n as u32);
        }
    }

    #[test]
    fn test_ports_and_priorities_pairwise_distinct() {
        let budget = ComputeBudget::default();
        let subdomains: Vec<String> = (0..40).map(|i| format!("tenant{i}")).collect();
        let tenants = budget.partition(&subdomains, SplitRatio::EVEN).unwrap();

        let ports: HashSet<u16> = tenants.iter().map(|t| t.port).collect();
        let priorities: HashSet<u32> = tenants.iter().map(|t| t.routing_priority).collect();
        assert_eq!(ports.len(), 40);
        assert_eq!(priorities.len(), 40);
        for (i, t) in tenants.iter().enumerate() {
            assert_eq!(t.port, 9000 + i as u16);
            assert_eq!(t.routing_priority, t.port as u32);
        }
    }

    #[test]
    fn test_weighted_split() {
        let budget = ComputeBudget::default();
        let (app, storage) = budget.split(1, SplitRatio::APP_WEIGHTED).unwrap();
        assert_eq!(app, TaskShare { cpu_units: 768, memory_mb: 744 });
        assert_eq!(storage, TaskShare { cpu_units: 256, memory_mb: 248 });

        let (app, storage) = budget.split(3, SplitRatio::APP_WEIGHTED).unwrap();
        assert!(3 * (app.cpu_units + storage.cpu_units) <= budget.total_cpu_units);
        assert!(3 * (app.memory_mb + storage.memory_mb) <= budget.total_memory_mb);
    }

    #[test]
    fn test_zero_tenants_is_a_precondition_failure() {
        let budget = ComputeBudget::default();
        assert!(matches!(budget.per_task_share(0), Err(TemplateError::NoTenants)));
        assert!(matches!(
            budget.partition(&[], SplitRatio::EVEN),
            Err(TemplateError::NoTenants)
        ));
    }

    #[test]
    fn test_share_floors_to_zero_for_many_tenants() {
        let budget = ComputeBudget::default();
        assert_eq!(
            budget.per_task_share(600).unwrap(),
            TaskShare { cpu_units: 0, memory_mb: 0 }
        );

        let subdomains: Vec<String> = (0..600).map(|i| format!("tenant{i}")).collect();
        assert!(matches!(
            budget.partition(&subdomains, SplitRatio::EVEN),
            Err(TemplateError::BudgetTooSmall { tenants: 600, .. })
        ));
    }

    #[test]
    fn test_budget_too_small() {
        let budget = ComputeBudget {
            total_cpu_units: 4,
            total_memory_mb: 992,
            base_port: 9000,
        };
        assert_eq!(
            budget.per_task_share(3).unwrap(),
            TaskShare { cpu_units: 0, memory_mb: 165 }
        );
        assert!(matches!(
            budget.partition(&names(&["a", "b", "c"]), SplitRatio::EVEN),
            Err(TemplateError::BudgetTooSmall { tenants: 3, .. })
        ));
    }

    #[test]
    fn test_priority_range_enforced() {
        let budget = ComputeBudget {
            base_port: 49_999,
            ..ComputeBudget::default()
        };
        assert!(budget.partition(&names(&["a"]), SplitRatio::EVEN).is_ok());
        assert!(matches!(
            budget.partition(&names(&["a", "b", "c"]), SplitRatio::EVEN),
            Err(TemplateError::PriorityOutOfRange(50_001))
        ));
    }

    #[test]
    fn test_port_space_exhausted() {
        let budget = ComputeBudget {
            base_port: u16::MAX,
            ..ComputeBudget::default()
        };
        assert!(matches!(
            budget.port(1),
            Err(TemplateError::PortSpaceExhausted { .. })
        ));
    }
}
