//! Resource graph builder for the shared hosting service
//!
//! Nodes are emitted in a fixed order: parameters, network, load balancing,
//! storage, shared compute, per-tenant compute and finally outputs. Every
//! tenant gets its own target group, listener rule and service because a
//! listener rule forwards to exactly one target group and a service binds to
//! exactly one target group, so the graph grows linearly with tenant count.

mod compute;
mod load_balancer;
mod network;
mod storage;
mod tenant;

use crate::error::{Result, TemplateError};
use crate::graph::{Output, ResourceGraph};
use crate::intrinsics::get_att;
use crate::naming::LogicalIds;
use crate::parameters;
use crate::partition::{ComputeBudget, SplitRatio, Tenant};
use crate::stage::{Region, Stage};
use tracing::debug;

/// Everything a synthesis run needs, resolved before any node is created
#[derive(Debug, Clone)]
pub struct SynthesisInput {
    pub stage: Stage,
    pub region: Region,
    pub availability_zones: Vec<String>,
    pub subdomains: Vec<String>,
    pub budget: ComputeBudget,
    pub split: SplitRatio,
}

impl SynthesisInput {
    pub fn new(
        stage: Stage,
        region: Region,
        availability_zones: Vec<String>,
        subdomains: Vec<String>,
    ) -> Self {
        Self {
            stage,
            region,
            availability_zones,
            subdomains,
            budget: ComputeBudget::default(),
            split: SplitRatio::EVEN,
        }
    }

    pub fn with_budget(mut self, budget: ComputeBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_split(mut self, split: SplitRatio) -> Self {
        self.split = split;
        self
    }
}

/// Builds and validates the complete service graph
pub fn synthesize(input: &SynthesisInput) -> Result<ResourceGraph> {
    let builder = GraphBuilder::new(input)?;
    builder.build()
}

pub(crate) struct GraphBuilder {
    ids: LogicalIds,
    availability_zones: Vec<String>,
    tenants: Vec<Tenant>,
    graph: ResourceGraph,
}

impl GraphBuilder {
    fn new(input: &SynthesisInput) -> Result<Self> {
        let tenants = input.budget.partition(&input.subdomains, input.split)?;
        if input.availability_zones.is_empty() {
            return Err(TemplateError::NoAvailabilityZones(input.region.to_string()));
        }

        Ok(Self {
            ids: LogicalIds::new(input.stage),
            availability_zones: input.availability_zones.clone(),
            tenants,
            graph: ResourceGraph::new(),
        })
    }

    fn build(mut self) -> Result<ResourceGraph> {
        parameters::declare(&mut self.graph)?;

        self.add_network()?;
        self.add_load_balancing()?;
        self.add_storage()?;
        self.add_shared_compute()?;

        let tenants = std::mem::take(&mut self.tenants);
        for tenant in &tenants {
            self.add_tenant(tenant)?;
        }

        self.add_outputs()?;
        self.graph.validate()?;

        debug!(
            stage = %self.ids.stage(),
            tenants = tenants.len(),
            resources = self.graph.len(),
            "synthesized resource graph"
        );
        Ok(self.graph)
    }

    fn add_outputs(&mut self) -> Result<()> {
        let elb = self.elb_id();
        self.graph.add_output(
            self.ids.id("OutputElb"),
            Output::new(get_att(&elb, "DNSName")).description("Elastic Load Balancer Public DNS"),
        )?;
        self.graph.add_output(
            self.ids.id("OutputElbHostedZone"),
            Output::new(get_att(&elb, "CanonicalHostedZoneID"))
                .description("Elastic Load Balancer canonical hosted zone id"),
        )?;
        Ok(())
    }

    // Shared node ids, referenced across the submodules

    fn vpc_id(&self) -> String {
        self.ids.id("VPC")
    }

    fn subnet_id(&self, index: usize) -> String {
        self.ids.indexed_id("Subnet", index)
    }

    fn subnet_ids(&self) -> Vec<String> {
        (0..crate::constants::NUM_SUBNETS)
            .map(|i| self.subnet_id(i))
            .collect()
    }

    fn gateway_attachment_id(&self) -> String {
        self.ids.id("VpcInternetGatewayAttachment")
    }

    fn elb_id(&self) -> String {
        self.ids.id("AppLoadBalancer")
    }

    fn elb_security_group_id(&self) -> String {
        self.ids.id("LBSecurityGroup")
    }

    fn listener_id(&self) -> String {
        self.ids.id("ElbHttpsListener")
    }

    fn instance_security_group_id(&self) -> String {
        self.ids.id("Ec2SecurityGroup")
    }

    fn file_system_id(&self) -> String {
        self.ids.id("Efs")
    }

    fn cluster_id(&self) -> String {
        self.ids.id("EcsCluster")
    }

    fn log_group_id(&self) -> String {
        self.ids.id("EcsCloudWatchLogGroup")
    }

    fn target_group_id(&self, subdomain: &str) -> String {
        self.ids.tenant_id("LBTargetGroup", subdomain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Resource;
    use serde_json::Value;

    fn input(subdomains: &[&str]) -> SynthesisInput {
        SynthesisInput::new(
            Stage::Gamma,
            Region::default(),
            vec!["us-west-2a".into(), "us-west-2b".into()],
            subdomains.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn resource<'a>(graph: &'a ResourceGraph, id: &str) -> &'a Resource {
        graph
            .resource(id)
            .unwrap_or_else(|| panic!("missing resource {id}"))
    }

    fn deps(graph: &ResourceGraph, id: &str) -> Vec<String> {
        resource(graph, id).depends_on.iter().cloned().collect()
    }

    #[test]
    fn test_graph_scales_linearly_with_tenants() {
        let one = synthesize(&input(&["blog"])).unwrap();
        let two = synthesize(&input(&["blog", "shop"])).unwrap();
        let three = synthesize(&input(&["blog", "shop", "news"])).unwrap();

        let per_tenant = two.len() - one.len();
        assert_eq!(three.len() - two.len(), per_tenant);
        assert_eq!(per_tenant, 7);
    }

    #[test]
    fn test_required_dependency_edges() {
        let graph = synthesize(&input(&["blog", "shop"])).unwrap();

        assert_eq!(
            deps(&graph, "PublicRouteGamma"),
            vec!["VpcInternetGatewayAttachmentGamma"]
        );
        assert_eq!(
            deps(&graph, "HttpsListenerRuleGammablog"),
            vec!["ElbHttpsListenerGamma"]
        );
        assert_eq!(
            deps(&graph, "WpEcsServiceGammashop"),
            vec![
                "AppLoadBalancerGamma",
                "ElbHttpsListenerGamma",
                "HttpsListenerRuleGammashop",
                "LBTargetGroupGammashop",
            ]
        );
        assert_eq!(
            deps(&graph, "LBTargetGroupGammablog"),
            vec!["AppLoadBalancerGamma"]
        );
    }

    #[test]
    fn test_listener_rules_route_by_host_with_port_priority() {
        let graph = synthesize(&input(&["blog", "shop"])).unwrap();

        let rule = &resource(&graph, "HttpsListenerRuleGammashop").properties;
        assert_eq!(rule["Priority"], 9001);
        assert_eq!(rule["Conditions"][0]["Field"], "host-header");
        assert_eq!(
            rule["Conditions"][0]["Values"][0]["Fn::Sub"],
            "shop.${DomainName}"
        );
        assert_eq!(
            rule["Actions"][0]["TargetGroupArn"]["Ref"],
            "LBTargetGroupGammashop"
        );

        let listener = &resource(&graph, "ElbHttpsListenerGamma").properties;
        assert_eq!(
            listener["DefaultActions"][0]["TargetGroupArn"]["Ref"],
            "LBTargetGroupGammablog"
        );
        assert_eq!(listener["Port"], 443);
    }

    #[test]
    fn test_task_definition_uses_partitioned_share() {
        let graph = synthesize(&input(&["blog", "shop"])).unwrap();
        let task = &resource(&graph, "WpTaskDefGammablog").properties;
        let containers = task["ContainerDefinitions"].as_array().unwrap();
        assert_eq!(containers.len(), 2);
        for c in containers {
            assert_eq!(c["Cpu"], 256);
            assert_eq!(c["Memory"], 248);
            assert_eq!(c["LogConfiguration"]["LogDriver"], "awslogs");
        }
        assert_eq!(containers[0]["PortMappings"][0]["HostPort"], 9000);
        assert_eq!(containers[0]["PortMappings"][0]["ContainerPort"], 80);
        assert_eq!(containers[1]["Image"], "mariadb:10.3.2");

        let paths: Vec<&Value> = task["Volumes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| &v["Host"]["SourcePath"])
            .collect();
        assert_eq!(paths, vec!["/mnt/efs/blog/mysql/", "/mnt/efs/blog/wp-content/"]);
    }

    #[test]
    fn test_subnets_round_robin_over_zones() {
        let graph = synthesize(&input(&["blog"])).unwrap();
        let zones: Vec<&Value> = (0..3)
            .map(|i| &resource(&graph, &format!("SubnetGamma{i}")).properties["AvailabilityZone"])
            .collect();
        assert_eq!(zones, vec!["us-west-2a", "us-west-2b", "us-west-2a"]);
        assert_eq!(
            resource(&graph, "SubnetGamma2").properties["CidrBlock"],
            "10.0.2.0/24"
        );
    }

    #[test]
    fn test_outputs_expose_load_balancer() {
        let graph = synthesize(&input(&["blog"])).unwrap();
        let outputs = graph.outputs();
        assert_eq!(
            outputs["OutputElbGamma"].value["Fn::GetAtt"][1],
            "DNSName"
        );
        assert_eq!(
            outputs["OutputElbHostedZoneGamma"].value["Fn::GetAtt"][1],
            "CanonicalHostedZoneID"
        );
    }

    #[test]
    fn test_preconditions_fail_before_any_node() {
        assert!(matches!(
            synthesize(&input(&[])),
            Err(TemplateError::NoTenants)
        ));
        assert!(matches!(
            synthesize(&input(&["blog", "blog"])),
            Err(TemplateError::DuplicateTenant(_))
        ));

        let mut no_zones = input(&["blog"]);
        no_zones.availability_zones.clear();
        assert!(matches!(
            synthesize(&no_zones),
            Err(TemplateError::NoAvailabilityZones(region)) if region == "us-west-2"
        ));
    }

    #[test]
    fn test_stage_qualifies_every_id() {
        let mut prod = input(&["blog"]);
        prod.stage = Stage::Prod;
        let graph = synthesize(&prod).unwrap();
        assert!(graph.resources().keys().all(|id| id.contains("Prod")));
    }
}
