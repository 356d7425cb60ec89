use super::GraphBuilder;
use crate::error::Result;
use crate::graph::Resource;
use crate::intrinsics::reference;
use serde_json::json;

impl GraphBuilder {
    /// Shared file system, reachable from every subnet
    pub(super) fn add_storage(&mut self) -> Result<()> {
        let file_system = self.graph.add_resource(Resource::new(
            self.file_system_id(),
            "AWS::EFS::FileSystem",
            json!({ "PerformanceMode": "generalPurpose" }),
        ))?;

        let security_group = self.instance_security_group_id();
        for (index, subnet) in self.subnet_ids().iter().enumerate() {
            self.graph.add_resource(Resource::new(
                self.ids.indexed_id("EC2MountTarget", index),
                "AWS::EFS::MountTarget",
                json!({
                    "FileSystemId": reference(&file_system),
                    "SecurityGroups": [reference(&security_group)],
                    "SubnetId": reference(subnet),
                }),
            ))?;
        }
        Ok(())
    }
}
