use super::GraphBuilder;
use crate::constants::{
    ASG_SIZE, EFS_MOUNT_ROOT, INSTANCE_TYPE, LOG_GROUP_LABEL, LOG_RETENTION_DAYS,
};
use crate::error::Result;
use crate::graph::Resource;
use crate::intrinsics::{STACK_NAME, base64, join, reference, references, sub};
use crate::parameters::{ECS_AMI_ID, KEY_NAME};
use serde_json::{Value, json};

impl GraphBuilder {
    /// Cluster, log group and the single container instance every tenant shares
    pub(super) fn add_shared_compute(&mut self) -> Result<()> {
        let cluster = self.graph.add_resource(Resource::new(
            self.cluster_id(),
            "AWS::ECS::Cluster",
            json!({}),
        ))?;

        self.graph.add_resource(Resource::new(
            self.log_group_id(),
            "AWS::Logs::LogGroup",
            json!({
                "LogGroupName": join("-", vec![
                    reference(STACK_NAME),
                    json!(LOG_GROUP_LABEL),
                    json!(self.ids.stage().as_str()),
                ]),
                "RetentionInDays": LOG_RETENTION_DAYS,
            }),
        ))?;

        let role = self.graph.add_resource(Resource::new(
            self.ids.id("Ec2IamRole"),
            "AWS::IAM::Role",
            json!({
                "AssumeRolePolicyDocument": assume_role_policy("ec2.amazonaws.com"),
                "Path": "/",
                "Policies": [{
                    "PolicyName": "ec2-ecs-service-access",
                    "PolicyDocument": allow_policy(&[
                        "ecs:CreateCluster",
                        "ecs:DeregisterContainerInstance",
                        "ecs:DiscoverPollEndpoint",
                        "ecs:Poll",
                        "ecs:RegisterContainerInstance",
                        "ecs:StartTelemetrySession",
                        "ecs:Submit*",
                        "logs:CreateLogStream",
                        "logs:PutLogEvents",
                    ]),
                }],
            }),
        ))?;

        let profile = self.graph.add_resource(Resource::new(
            self.ids.id("Ec2InstanceIamProfile"),
            "AWS::IAM::InstanceProfile",
            json!({ "Roles": [reference(&role)] }),
        ))?;

        let asg_id = self.ids.id("EcsAutoScalingGroup");
        let launch_config = self.graph.add_resource(Resource::new(
            self.ids.id("EcsLaunchConfig"),
            "AWS::AutoScaling::LaunchConfiguration",
            json!({
                "IamInstanceProfile": reference(&profile),
                "ImageId": reference(ECS_AMI_ID),
                "InstanceMonitoring": false,
                "InstanceType": INSTANCE_TYPE,
                "KeyName": reference(KEY_NAME),
                "SecurityGroups": [reference(&self.instance_security_group_id())],
                "UserData": base64(sub(&self.user_data(&cluster, &asg_id))),
            }),
        ))?;

        self.graph.add_resource(Resource::new(
            asg_id,
            "AWS::AutoScaling::AutoScalingGroup",
            json!({
                "DesiredCapacity": ASG_SIZE,
                "LaunchConfigurationName": reference(&launch_config),
                "MaxSize": ASG_SIZE,
                "MinSize": ASG_SIZE,
                "VPCZoneIdentifier": references(&self.subnet_ids()),
            }),
        ))?;
        Ok(())
    }

    /// Joins the cluster and mounts the shared file system on boot
    fn user_data(&self, cluster: &str, asg: &str) -> String {
        [
            "#!/bin/bash -xe".to_string(),
            format!("echo ECS_CLUSTER=${{{cluster}}} >> /etc/ecs/ecs.config"),
            "yum install -y aws-cfn-bootstrap nfs-utils".to_string(),
            format!("mkdir -p {EFS_MOUNT_ROOT}/"),
            format!("chown ec2-user:ec2-user {EFS_MOUNT_ROOT}/"),
            format!(
                "mount -t nfs -o nfsvers=4.1,rsize=1048576,wsize=1048576,hard,timeo=600,retrans=2 \
                 ${{{}}}.efs.${{AWS::Region}}.amazonaws.com:/ {EFS_MOUNT_ROOT}/",
                self.file_system_id()
            ),
            format!(
                "/opt/aws/bin/cfn-signal -e $? --stack ${{AWS::StackName}} --region ${{AWS::Region}} --resource {asg}"
            ),
            String::new(),
        ]
        .join("\n")
    }
}

pub(super) fn assume_role_policy(service: &str) -> Value {
    json!({
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": [service] },
            "Action": ["sts:AssumeRole"],
        }]
    })
}

pub(super) fn allow_policy(actions: &[&str]) -> Value {
    json!({
        "Statement": [{
            "Effect": "Allow",
            "Action": actions,
            "Resource": "*",
        }]
    })
}
