//! Logical identifier allocation
//!
//! Every node of a resource graph is keyed by `<base><Stage>[<tenant>]`.
//! For a fixed stage, ids are unique as long as the tenant fragments are
//! pairwise distinct, which [`validate_subdomains`] enforces before synthesis.

use crate::error::{Result, TemplateError};
use crate::stage::Stage;
use std::collections::HashMap;

const MAX_LABEL_LEN: usize = 63;

/// Stage-qualified logical id factory
#[derive(Debug, Clone, Copy)]
pub struct LogicalIds {
    stage: Stage,
}

impl LogicalIds {
    pub fn new(stage: Stage) -> Self {
        Self { stage }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// `<base><Stage>`
    pub fn id(&self, base: &str) -> String {
        format!("{}{}", base, self.stage)
    }

    /// `<base><Stage><tenant fragment>`
    pub fn tenant_id(&self, base: &str, subdomain: &str) -> String {
        format!("{}{}{}", base, self.stage, id_fragment(subdomain))
    }

    /// `<base><Stage><index>` for repeated shared nodes (subnets, mount targets)
    pub fn indexed_id(&self, base: &str, index: usize) -> String {
        format!("{}{}{}", base, self.stage, index)
    }
}

/// Logical ids only admit alphanumerics, so DNS label hyphens are dropped
pub fn id_fragment(subdomain: &str) -> String {
    subdomain
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Rejects empty tenant lists, malformed labels, duplicates and fragment collisions
pub fn validate_subdomains(subdomains: &[String]) -> Result<()> {
    if subdomains.is_empty() {
        return Err(TemplateError::NoTenants);
    }

    let mut fragments: HashMap<String, &str> = HashMap::new();
    for name in subdomains {
        validate_label(name)?;

        let fragment = id_fragment(name);
        if let Some(first) = fragments.get(&fragment) {
            if *first == name.as_str() {
                return Err(TemplateError::DuplicateTenant(name.clone()));
            }
            return Err(TemplateError::TenantIdCollision {
                first: first.to_string(),
                second: name.clone(),
                fragment,
            });
        }
        fragments.insert(fragment, name.as_str());
    }

    Ok(())
}

fn validate_label(name: &str) -> Result<()> {
    let invalid = |reason: &str| TemplateError::InvalidTenantName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.len() > MAX_LABEL_LEN {
        return Err(invalid("must be at most 63 characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid("only lowercase letters, digits and '-' are allowed"));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(invalid("must not start or end with '-'"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_id_policy() {
        let ids = LogicalIds::new(Stage::Gamma);
        assert_eq!(ids.id("VPC"), "VPCGamma");
        assert_eq!(ids.tenant_id("LBTargetGroup", "blog"), "LBTargetGroupGammablog");
        assert_eq!(ids.tenant_id("LBTargetGroup", "my-shop"), "LBTargetGroupGammamyshop");
        assert_eq!(ids.indexed_id("Subnet", 2), "SubnetGamma2");
    }

    #[test]
    fn test_distinct_tenants_yield_distinct_ids() {
        let ids = LogicalIds::new(Stage::Prod);
        let tenants = names(&["blog", "shop", "news", "a1"]);
        validate_subdomains(&tenants).unwrap();

        let mut seen = std::collections::HashSet::new();
        for t in &tenants {
            assert!(seen.insert(ids.tenant_id("WpEcsService", t)));
        }
    }

    #[test]
    fn test_empty_tenant_list_rejected() {
        assert!(matches!(
            validate_subdomains(&[]),
            Err(TemplateError::NoTenants)
        ));
    }

    #[test]
    fn test_duplicate_tenant_rejected() {
        let err = validate_subdomains(&names(&["blog", "shop", "blog"])).unwrap_err();
        assert!(matches!(err, TemplateError::DuplicateTenant(ref n) if n == "blog"));
    }

    #[test]
    fn test_fragment_collision_rejected() {
        let err = validate_subdomains(&names(&["myblog", "my-blog"])).unwrap_err();
        match err {
            TemplateError::TenantIdCollision {
                first,
                second,
                fragment,
            } => {
                assert_eq!(first, "myblog");
                assert_eq!(second, "my-blog");
                assert_eq!(fragment, "myblog");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_labels_rejected() {
        for bad in ["", "-blog", "blog-", "Blog", "blog.shop", "blog_1"] {
            assert!(
                matches!(
                    validate_subdomains(&names(&[bad])),
                    Err(TemplateError::InvalidTenantName { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
        assert!(validate_subdomains(&["a".repeat(64)]).is_err());
        assert!(validate_subdomains(&["a".repeat(63)]).is_ok());
    }
}
