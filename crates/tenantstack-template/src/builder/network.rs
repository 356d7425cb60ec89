use super::GraphBuilder;
use crate::constants::{
    ALL_IPS, ALL_PROTOCOLS, NFS_PORT, NUM_SUBNETS, SSH_PORT, TCP_PROTOCOL, VPC_CIDR, subnet_cidr,
};
use crate::error::Result;
use crate::graph::Resource;
use crate::intrinsics::{STACK_NAME, reference};
use serde_json::{Value, json};

impl GraphBuilder {
    /// VPC, public subnets, gateway, routing and the instance security group
    pub(super) fn add_network(&mut self) -> Result<()> {
        let vpc = self.vpc_id();
        self.graph.add_resource(Resource::new(
            &vpc,
            "AWS::EC2::VPC",
            json!({
                "CidrBlock": VPC_CIDR,
                "EnableDnsHostnames": true,
                "InstanceTenancy": "default",
            }),
        ))?;

        for index in 0..NUM_SUBNETS {
            let zone = &self.availability_zones[index % self.availability_zones.len()];
            self.graph.add_resource(Resource::new(
                self.subnet_id(index),
                "AWS::EC2::Subnet",
                json!({
                    "AvailabilityZone": zone,
                    "CidrBlock": subnet_cidr(index),
                    "MapPublicIpOnLaunch": true,
                    "VpcId": reference(&vpc),
                }),
            ))?;
        }

        let gateway = self.graph.add_resource(Resource::new(
            self.ids.id("InternetGateway"),
            "AWS::EC2::InternetGateway",
            json!({
                "Tags": [{ "Key": "StackName", "Value": reference(STACK_NAME) }],
            }),
        ))?;

        let attachment = self.graph.add_resource(Resource::new(
            self.gateway_attachment_id(),
            "AWS::EC2::VPCGatewayAttachment",
            json!({
                "InternetGatewayId": reference(&gateway),
                "VpcId": reference(&vpc),
            }),
        ))?;

        let route_table = self.graph.add_resource(Resource::new(
            self.ids.id("VpcRouteTable"),
            "AWS::EC2::RouteTable",
            json!({ "VpcId": reference(&vpc) }),
        ))?;

        // The route holds no reference to the attachment but fails without it
        self.graph.add_resource(
            Resource::new(
                self.ids.id("PublicRoute"),
                "AWS::EC2::Route",
                json!({
                    "DestinationCidrBlock": ALL_IPS,
                    "GatewayId": reference(&gateway),
                    "RouteTableId": reference(&route_table),
                }),
            )
            .depends_on(attachment),
        )?;

        for (index, subnet) in self.subnet_ids().iter().enumerate() {
            self.graph.add_resource(Resource::new(
                self.ids.indexed_id("SubnetRouteTableAssoc", index),
                "AWS::EC2::SubnetRouteTableAssociation",
                json!({
                    "RouteTableId": reference(&route_table),
                    "SubnetId": reference(subnet),
                }),
            ))?;
        }

        self.add_instance_security_group()
    }

    fn add_instance_security_group(&mut self) -> Result<()> {
        let group = self.graph.add_resource(Resource::new(
            self.instance_security_group_id(),
            "AWS::EC2::SecurityGroup",
            json!({
                "GroupDescription": "Security group for the EC2 instances running in the ECS cluster",
                "SecurityGroupEgress": [egress_anywhere()],
                "SecurityGroupIngress": [ingress_from_cidr(SSH_PORT)],
                "VpcId": reference(&self.vpc_id()),
            }),
        ))?;

        // Instances mount the shared file system from each other
        self.graph.add_resource(Resource::new(
            self.ids.id("EC2SecurityGroupIngressEFS"),
            "AWS::EC2::SecurityGroupIngress",
            ingress_from_group(&group, &group, NFS_PORT),
        ))?;
        Ok(())
    }
}

pub(super) fn egress_anywhere() -> Value {
    json!({ "CidrIp": ALL_IPS, "IpProtocol": ALL_PROTOCOLS })
}

pub(super) fn ingress_from_cidr(port: u16) -> Value {
    json!({
        "CidrIp": ALL_IPS,
        "FromPort": port,
        "IpProtocol": TCP_PROTOCOL,
        "ToPort": port,
    })
}

/// Properties of a standalone ingress rule opening `port` on `group` to `source`
pub(super) fn ingress_from_group(group: &str, source: &str, port: u16) -> Value {
    json!({
        "FromPort": port,
        "GroupId": reference(group),
        "IpProtocol": TCP_PROTOCOL,
        "SourceSecurityGroupId": reference(source),
        "ToPort": port,
    })
}
