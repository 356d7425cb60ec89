//! Network, image and sizing constants used by the graph builder

pub const HTTP_PROTOCOL: &str = "HTTP";
pub const HTTPS_PROTOCOL: &str = "HTTPS";
pub const TCP_PROTOCOL: &str = "tcp";
pub const ALL_PROTOCOLS: &str = "-1";
pub const ALL_IPS: &str = "0.0.0.0/0";

pub const HTTP_PORT: u16 = 80;
pub const HTTPS_PORT: u16 = 443;
pub const SSH_PORT: u16 = 22;
pub const NFS_PORT: u16 = 2049;

pub const VPC_CIDR: &str = "10.0.0.0/16";
pub const NUM_SUBNETS: usize = 3;

/// `10.0.<index>.0/24`
pub fn subnet_cidr(index: usize) -> String {
    format!("10.0.{}.0/24", index)
}

pub const INSTANCE_TYPE: &str = "t2.micro";
pub const ASG_SIZE: &str = "1";
pub const ELB_IDLE_TIMEOUT_SECONDS: &str = "30";

pub const APP_IMAGE: &str = "wordpress";
pub const STORAGE_IMAGE: &str = "mariadb:10.3.2";
/// Name under which the storage container is linked into the app container
pub const STORAGE_LINK_ALIAS: &str = "mysql";
pub const APP_CONTENT_PATH: &str = "/var/www/html/wp-content";
pub const STORAGE_DATA_PATH: &str = "/var/lib/mysql";
pub const EFS_MOUNT_ROOT: &str = "/mnt/efs";

pub const LOG_DRIVER: &str = "awslogs";
pub const LOG_STREAM_PREFIX: &str = "wordpress";
pub const LOG_GROUP_LABEL: &str = "WordPress";
pub const LOG_RETENTION_DAYS: u32 = 7;

pub const HEALTH_CHECK_PATH: &str = "/";
pub const HEALTH_CHECK_INTERVAL_SECONDS: u32 = 10;
pub const HEALTH_CHECK_TIMEOUT_SECONDS: u32 = 5;
pub const HEALTHY_THRESHOLD: u32 = 2;
pub const UNHEALTHY_THRESHOLD: u32 = 2;
pub const HEALTHY_HTTP_CODES: &str = "200,301,302";
