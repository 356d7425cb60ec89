//! Stack parameters and their apply-time values

use crate::error::Result;
use crate::graph::{Parameter, ParameterValue, ResourceGraph};

pub const MYSQL_PASSWORD: &str = "MysqlPassword";
pub const DOMAIN_NAME: &str = "DomainName";
pub const CERTIFICATE_ARN: &str = "CertificateArn";
pub const KEY_NAME: &str = "KeyName";
pub const ECS_AMI_ID: &str = "EcsAmiId";

const ECS_AMI_PARAMETER_TYPE: &str = "AWS::SSM::Parameter::Value<AWS::EC2::Image::Id>";
const ECS_AMI_SSM_PATH: &str = "/aws/service/ecs/optimized-ami/amazon-linux-2/recommended/image_id";

/// Declares every parameter the service graph references
pub fn declare(graph: &mut ResourceGraph) -> Result<()> {
    graph.add_parameter(
        MYSQL_PASSWORD,
        Parameter::string()
            .allowed_pattern("[a-zA-Z][a-zA-Z0-9]*")
            .constraint_description(
                "must begin with a letter and contain only alphanumeric characters",
            )
            .description("Password for the mysql database")
            .length(8, 64)
            .no_echo(),
    )?;
    graph.add_parameter(
        DOMAIN_NAME,
        Parameter::string()
            .allowed_pattern("[a-zA-Z][a-zA-Z0-9-]*.[a-zA-Z]+")
            .constraint_description("must be a URL")
            .description("Domain name hosting the tenant subdomains"),
    )?;
    graph.add_parameter(
        CERTIFICATE_ARN,
        Parameter::string()
            .allowed_pattern("arn:aws:acm:.*certificate.*")
            .constraint_description("must be a certificate ARN")
            .description("AWS ACM Certificate ARN"),
    )?;
    graph.add_parameter(
        KEY_NAME,
        Parameter::of_type("AWS::EC2::KeyPair::KeyName")
            .constraint_description("must be the name of an existing EC2 key pair")
            .description("EC2 key pair for SSH access to the container instances"),
    )?;
    graph.add_parameter(
        ECS_AMI_ID,
        Parameter::of_type(ECS_AMI_PARAMETER_TYPE)
            .default_value(ECS_AMI_SSM_PATH)
            .description("ECS optimized image for the container instances"),
    )?;
    Ok(())
}

/// Values bound to the parameters when the stack is created or updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterValues {
    pub db_password: String,
    pub domain_name: String,
    pub certificate_arn: String,
    pub key_name: String,
}

impl ParameterValues {
    /// Ordered key/value list; the image id keeps its default
    pub fn to_list(&self) -> Vec<ParameterValue> {
        vec![
            ParameterValue::new(MYSQL_PASSWORD, &self.db_password),
            ParameterValue::new(DOMAIN_NAME, &self.domain_name),
            ParameterValue::new(CERTIFICATE_ARN, &self.certificate_arn),
            ParameterValue::new(KEY_NAME, &self.key_name),
        ]
    }
}
