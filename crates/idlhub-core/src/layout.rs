//! Artifact address → storage path mapping.
//!
//! The catalog is a fixed three-level tree under [`CATALOG_ROOT`]:
//! `/projects/{project}/{type}/{version}/data.tar.gz`.

/// Top of the catalog tree.
pub const CATALOG_ROOT: &str = "/projects";

/// File name of a version's stored archive.
pub const PAYLOAD_NAME: &str = "data.tar.gz";

pub fn project_path(project: &str) -> String {
    format!("{CATALOG_ROOT}/{project}")
}

pub fn type_path(project: &str, idl_type: &str) -> String {
    format!("{CATALOG_ROOT}/{project}/{idl_type}")
}

pub fn version_path(project: &str, idl_type: &str, version: &str) -> String {
    format!("{CATALOG_ROOT}/{project}/{idl_type}/{version}")
}

pub fn payload_path(project: &str, idl_type: &str, version: &str) -> String {
    format!("{}/{PAYLOAD_NAME}", version_path(project, idl_type, version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_map_to_one_location() {
        assert_eq!(project_path("acme"), "/projects/acme");
        assert_eq!(type_path("acme", "protobuf"), "/projects/acme/protobuf");
        assert_eq!(
            version_path("acme", "protobuf", "1.2.3"),
            "/projects/acme/protobuf/1.2.3"
        );
        assert_eq!(
            payload_path("acme", "protobuf", "1.2.3"),
            "/projects/acme/protobuf/1.2.3/data.tar.gz"
        );
    }
}
