pub mod s3_publisher;
