use super::GraphBuilder;
use super::network::{egress_anywhere, ingress_from_cidr};
use crate::constants::{ELB_IDLE_TIMEOUT_SECONDS, HTTPS_PORT, HTTPS_PROTOCOL};
use crate::error::{Result, TemplateError};
use crate::graph::Resource;
use crate::intrinsics::{reference, references};
use crate::parameters::CERTIFICATE_ARN;
use serde_json::json;

impl GraphBuilder {
    /// Shared load balancer, its security group and the HTTPS listener
    pub(super) fn add_load_balancing(&mut self) -> Result<()> {
        let security_group = self.graph.add_resource(Resource::new(
            self.elb_security_group_id(),
            "AWS::EC2::SecurityGroup",
            json!({
                "GroupDescription": "Security group for the Application level load balancer",
                "SecurityGroupEgress": [egress_anywhere()],
                "SecurityGroupIngress": [ingress_from_cidr(HTTPS_PORT)],
                "VpcId": reference(&self.vpc_id()),
            }),
        ))?;

        let elb = self.graph.add_resource(Resource::new(
            self.elb_id(),
            "AWS::ElasticLoadBalancingV2::LoadBalancer",
            json!({
                "LoadBalancerAttributes": [{
                    "Key": "idle_timeout.timeout_seconds",
                    "Value": ELB_IDLE_TIMEOUT_SECONDS,
                }],
                "Name": self.ids.id("TenantStackElb"),
                "SecurityGroups": [reference(&security_group)],
                "Subnets": references(&self.subnet_ids()),
            }),
        ))?;

        // Requests matching no host rule land on the first tenant
        let first = self.tenants.first().ok_or(TemplateError::NoTenants)?;
        let default_target = self.target_group_id(&first.subdomain);
        self.graph.add_resource(Resource::new(
            self.listener_id(),
            "AWS::ElasticLoadBalancingV2::Listener",
            json!({
                "Certificates": [{ "CertificateArn": reference(CERTIFICATE_ARN) }],
                "DefaultActions": [{
                    "TargetGroupArn": reference(&default_target),
                    "Type": "forward",
                }],
                "LoadBalancerArn": reference(&elb),
                "Port": HTTPS_PORT,
                "Protocol": HTTPS_PROTOCOL,
            }),
        ))?;
        Ok(())
    }
}
