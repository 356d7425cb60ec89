use super::GraphBuilder;
use super::compute::{allow_policy, assume_role_policy};
use super::network::ingress_from_group;
use crate::constants::{
    APP_CONTENT_PATH, APP_IMAGE, EFS_MOUNT_ROOT, HEALTH_CHECK_INTERVAL_SECONDS, HEALTH_CHECK_PATH,
    HEALTH_CHECK_TIMEOUT_SECONDS, HEALTHY_HTTP_CODES, HEALTHY_THRESHOLD, HTTP_PORT, HTTP_PROTOCOL,
    LOG_DRIVER, LOG_STREAM_PREFIX, STORAGE_DATA_PATH, STORAGE_IMAGE, STORAGE_LINK_ALIAS,
    TCP_PROTOCOL, UNHEALTHY_THRESHOLD,
};
use crate::error::Result;
use crate::graph::Resource;
use crate::intrinsics::{REGION, reference, sub};
use crate::parameters::{DOMAIN_NAME, MYSQL_PASSWORD};
use crate::partition::{TaskShare, Tenant};
use serde_json::{Value, json};

/// Per-tenant names that never become graph nodes
struct ContainerNames {
    app: String,
    storage: String,
    content_volume: String,
    data_volume: String,
}

impl GraphBuilder {
    /// Target group, routing rule, ingress, role, task definition and service for one tenant
    pub(super) fn add_tenant(&mut self, tenant: &Tenant) -> Result<()> {
        let subdomain = tenant.subdomain.as_str();
        let elb = self.elb_id();
        let listener = self.listener_id();

        let target_group = self.graph.add_resource(
            Resource::new(
                self.target_group_id(subdomain),
                "AWS::ElasticLoadBalancingV2::TargetGroup",
                json!({
                    "HealthCheckIntervalSeconds": HEALTH_CHECK_INTERVAL_SECONDS,
                    "HealthCheckPath": HEALTH_CHECK_PATH,
                    "HealthCheckPort": tenant.port.to_string(),
                    "HealthCheckProtocol": HTTP_PROTOCOL,
                    "HealthCheckTimeoutSeconds": HEALTH_CHECK_TIMEOUT_SECONDS,
                    "HealthyThresholdCount": HEALTHY_THRESHOLD,
                    "Matcher": { "HttpCode": HEALTHY_HTTP_CODES },
                    "Port": tenant.port,
                    "Protocol": HTTP_PROTOCOL,
                    "UnhealthyThresholdCount": UNHEALTHY_THRESHOLD,
                    "VpcId": reference(&self.vpc_id()),
                }),
            )
            .depends_on(&elb),
        )?;

        let rule = self.graph.add_resource(
            Resource::new(
                self.ids.tenant_id("HttpsListenerRule", subdomain),
                "AWS::ElasticLoadBalancingV2::ListenerRule",
                json!({
                    "Actions": [{
                        "TargetGroupArn": reference(&target_group),
                        "Type": "forward",
                    }],
                    "Conditions": [{
                        "Field": "host-header",
                        "Values": [sub(&format!("{}.${{{}}}", subdomain, DOMAIN_NAME))],
                    }],
                    "ListenerArn": reference(&listener),
                    "Priority": tenant.routing_priority,
                }),
            )
            .depends_on(&listener),
        )?;

        let instances = self.instance_security_group_id();
        let elb_group = self.elb_security_group_id();
        for (base, source) in [
            ("EC2SecurityGroupIngressFromElb", &elb_group),
            ("EC2SecurityGroupIngressFromPeers", &instances),
        ] {
            self.graph.add_resource(Resource::new(
                self.ids.tenant_id(base, subdomain),
                "AWS::EC2::SecurityGroupIngress",
                ingress_from_group(&instances, source, tenant.port),
            ))?;
        }

        let role = self.graph.add_resource(Resource::new(
            self.ids.tenant_id("WpServiceRole", subdomain),
            "AWS::IAM::Role",
            json!({
                "AssumeRolePolicyDocument": assume_role_policy("ecs.amazonaws.com"),
                "Path": "/",
                "Policies": [{
                    "PolicyName": "ecs-service-policy",
                    "PolicyDocument": allow_policy(&[
                        "elasticloadbalancing:DeregisterInstancesFromLoadBalancer",
                        "elasticloadbalancing:DeregisterTargets",
                        "elasticloadbalancing:Describe*",
                        "elasticloadbalancing:RegisterInstancesWithLoadBalancer",
                        "elasticloadbalancing:RegisterTargets",
                        "ec2:Describe*",
                        "ec2:AuthorizeSecurityGroupIngress",
                    ]),
                }],
            }),
        ))?;

        let names = self.container_names(subdomain);
        let task = self.graph.add_resource(Resource::new(
            self.ids.tenant_id("WpTaskDef", subdomain),
            "AWS::ECS::TaskDefinition",
            json!({
                "ContainerDefinitions": [
                    self.app_container(tenant, &names),
                    self.storage_container(tenant.storage, &names),
                ],
                "Volumes": [
                    host_volume(&names.data_volume, subdomain, "mysql"),
                    host_volume(&names.content_volume, subdomain, "wp-content"),
                ],
            }),
        ))?;

        // The routing rule must exist before traffic reaches a not-yet-registered service
        self.graph.add_resource(
            Resource::new(
                self.ids.tenant_id("WpEcsService", subdomain),
                "AWS::ECS::Service",
                json!({
                    "Cluster": reference(&self.cluster_id()),
                    "DesiredCount": 1,
                    "LoadBalancers": [{
                        "ContainerName": names.app,
                        "ContainerPort": HTTP_PORT,
                        "TargetGroupArn": reference(&target_group),
                    }],
                    "Role": reference(&role),
                    "TaskDefinition": reference(&task),
                }),
            )
            .depends_on(&listener)
            .depends_on(&elb)
            .depends_on(&target_group)
            .depends_on(rule),
        )?;

        Ok(())
    }

    fn container_names(&self, subdomain: &str) -> ContainerNames {
        ContainerNames {
            app: self.ids.tenant_id("WpServiceContainer", subdomain),
            storage: self.ids.tenant_id("MariaDbContainer", subdomain),
            content_volume: self.ids.tenant_id("WpContentVolume", subdomain),
            data_volume: self.ids.tenant_id("MySqlVolume", subdomain),
        }
    }

    fn app_container(&self, tenant: &Tenant, names: &ContainerNames) -> Value {
        json!({
            "Cpu": tenant.app.cpu_units,
            "Environment": [
                { "Name": "WORDPRESS_DB_PASSWORD", "Value": reference(MYSQL_PASSWORD) },
                { "Name": "WORDPRESS_TABLE_PREFIX", "Value": tenant.subdomain },
            ],
            "Essential": true,
            "Image": APP_IMAGE,
            "Links": [format!("{}:{}", names.storage, STORAGE_LINK_ALIAS)],
            "LogConfiguration": self.log_configuration(),
            "Memory": tenant.app.memory_mb,
            "MountPoints": [{
                "ContainerPath": APP_CONTENT_PATH,
                "SourceVolume": names.content_volume,
            }],
            "Name": names.app,
            "PortMappings": [{
                "ContainerPort": HTTP_PORT,
                "HostPort": tenant.port,
                "Protocol": TCP_PROTOCOL,
            }],
        })
    }

    fn storage_container(&self, share: TaskShare, names: &ContainerNames) -> Value {
        json!({
            "Cpu": share.cpu_units,
            "Environment": [
                { "Name": "MYSQL_ROOT_PASSWORD", "Value": reference(MYSQL_PASSWORD) },
            ],
            "Essential": true,
            "Image": STORAGE_IMAGE,
            "LogConfiguration": self.log_configuration(),
            "Memory": share.memory_mb,
            "MountPoints": [{
                "ContainerPath": STORAGE_DATA_PATH,
                "SourceVolume": names.data_volume,
            }],
            "Name": names.storage,
        })
    }

    fn log_configuration(&self) -> Value {
        json!({
            "LogDriver": LOG_DRIVER,
            "Options": {
                "awslogs-group": reference(&self.log_group_id()),
                "awslogs-region": reference(REGION),
                "awslogs-stream-prefix": LOG_STREAM_PREFIX,
            },
        })
    }
}

fn host_volume(name: &str, subdomain: &str, directory: &str) -> Value {
    json!({
        "Host": { "SourcePath": format!("{EFS_MOUNT_ROOT}/{subdomain}/{directory}/") },
        "Name": name,
    })
}
