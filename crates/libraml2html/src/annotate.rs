//! Resource tree annotation and base URI resolution.

use tracing::trace;

use crate::model::{Parameter, RamlDocument, Resources};

/// Placeholder in the base URI replaced by the document version.
const VERSION_PLACEHOLDER: &str = "{version}";

/// Annotates every resource in the document with its parent URL, unique id and
/// the cumulative list of URI parameters.
///
/// The walk is pre-order over each `resources` mapping in document order. A
/// document without resources is left untouched.
pub fn annotate(doc: &mut RamlDocument) -> &mut RamlDocument {
    annotate_resources(&mut doc.resources, "", &[]);
    doc
}

/// Annotates a resource mapping whose ancestors span `parent_path` and declare
/// `inherited` URI parameters.
pub fn annotate_resources(resources: &mut Resources, parent_path: &str, inherited: &[Parameter]) {
    for resource in resources.values_mut() {
        let path = format!("{parent_path}{}", resource.relative_uri);

        resource.parent_url = parent_path.to_string();
        resource.unique_id = unique_id(&path);

        let mut all = inherited.to_vec();
        all.extend(resource.uri_parameters.values().cloned());
        resource.all_uri_parameters = all;

        trace!(
            unique_id = %resource.unique_id,
            parameters = resource.all_uri_parameters.len(),
            "annotated resource"
        );

        annotate_resources(&mut resource.resources, &path, &resource.all_uri_parameters);
    }
}

/// Normalizes a path into an identifier by replacing every character other
/// than an ASCII letter, digit or underscore with `_`.
///
/// Distinct paths may collide, e.g. `/a-b` and `/a_b`.
pub fn unique_id(path: &str) -> String {
    path.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Substitutes the document version for the first `{version}` in the base URI.
///
/// Nothing happens when the base URI is absent or empty, or when the document
/// carries no version.
pub fn resolve_base_uri(doc: &mut RamlDocument) -> &mut RamlDocument {
    if let (Some(base_uri), Some(version)) = (doc.base_uri.as_mut(), doc.version.as_deref())
        && !base_uri.is_empty()
    {
        *base_uri = base_uri.replacen(VERSION_PLACEHOLDER, version, 1);
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Resource;
    use pretty_assertions::assert_eq;

    fn names(params: &[Parameter]) -> Vec<&str> {
        params.iter().map(|p| p.name.as_str()).collect()
    }

    fn nested_doc() -> RamlDocument {
        let posts = Resource::new("/posts/{postId}").with_uri_parameter(Parameter::new("postId"));
        let users = Resource::new("/users/{id}")
            .with_uri_parameter(Parameter::new("id"))
            .with_resource(posts);
        let mut doc = RamlDocument::default();
        doc.resources.insert(users.relative_uri.clone(), users);
        doc
    }

    #[test]
    fn test_nested_parameters_and_ids() {
        let mut doc = nested_doc();
        annotate(&mut doc);

        let users = &doc.resources["/users/{id}"];
        assert_eq!(users.parent_url, "");
        assert_eq!(users.unique_id, "_users__id_");
        assert_eq!(names(&users.all_uri_parameters), vec!["id"]);

        let posts = &users.resources["/posts/{postId}"];
        assert_eq!(posts.parent_url, "/users/{id}");
        assert_eq!(posts.unique_id, "_users__id__posts__postId_");
        assert_eq!(names(&posts.all_uri_parameters), vec!["id", "postId"]);
        assert_eq!(posts.full_uri(), "/users/{id}/posts/{postId}");
    }

    #[test]
    fn test_siblings_do_not_leak() {
        let mut doc = RamlDocument::default();
        let root = Resource::new("/root")
            .with_uri_parameter(Parameter::new("a"))
            .with_resource(
                Resource::new("/left")
                    .with_uri_parameter(Parameter::new("l1"))
                    .with_uri_parameter(Parameter::new("l2")),
            )
            .with_resource(Resource::new("/right").with_uri_parameter(Parameter::new("r")));
        doc.resources.insert("/root".to_string(), root);

        annotate(&mut doc);

        let root = &doc.resources["/root"];
        assert_eq!(names(&root.all_uri_parameters), vec!["a"]);
        assert_eq!(
            names(&root.resources["/left"].all_uri_parameters),
            vec!["a", "l1", "l2"]
        );
        assert_eq!(
            names(&root.resources["/right"].all_uri_parameters),
            vec!["a", "r"]
        );
    }

    #[test]
    fn test_parameter_count_matches_path() {
        fn check(resources: &Resources, ancestors: usize) {
            for resource in resources.values() {
                let own = resource.uri_parameters.len();
                assert_eq!(resource.all_uri_parameters.len(), ancestors + own);
                assert!(
                    resource
                        .unique_id
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_')
                );
                check(&resource.resources, ancestors + own);
            }
        }

        let mut doc = nested_doc();
        doc.resources
            .insert("/plain-path.json".to_string(), Resource::new("/plain-path.json"));
        annotate(&mut doc);
        check(&doc.resources, 0);
    }

    #[test]
    fn test_empty_document_is_untouched() {
        let mut doc = RamlDocument::default();
        annotate(&mut doc);
        assert_eq!(doc, RamlDocument::default());
    }

    #[test]
    fn test_unique_id_collisions_are_kept() {
        assert_eq!(unique_id("/a-b"), unique_id("/a_b"));
        assert_eq!(unique_id("/a-b"), "_a_b");
        assert_eq!(unique_id("/caf\u{e9}"), "_caf_");
    }

    #[test]
    fn test_annotation_is_idempotent() {
        let mut once = nested_doc();
        annotate(&mut once);
        let mut twice = once.clone();
        annotate(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_resolve_base_uri() {
        let mut doc = RamlDocument {
            base_uri: Some("http://api.example.com/{version}".to_string()),
            version: Some("v1".to_string()),
            ..RamlDocument::default()
        };
        resolve_base_uri(&mut doc);
        assert_eq!(doc.base_uri.as_deref(), Some("http://api.example.com/v1"));
    }

    #[test]
    fn test_resolve_base_uri_replaces_first_only() {
        let mut doc = RamlDocument {
            base_uri: Some("http://{version}.example.com/{version}".to_string()),
            version: Some("v2".to_string()),
            ..RamlDocument::default()
        };
        resolve_base_uri(&mut doc);
        assert_eq!(
            doc.base_uri.as_deref(),
            Some("http://v2.example.com/{version}")
        );
    }

    #[test]
    fn test_resolve_base_uri_noops() {
        let mut absent = RamlDocument {
            version: Some("v1".to_string()),
            ..RamlDocument::default()
        };
        let expected = absent.clone();
        resolve_base_uri(&mut absent);
        assert_eq!(absent, expected);

        let mut unversioned = RamlDocument {
            base_uri: Some("http://api.example.com/{version}".to_string()),
            ..RamlDocument::default()
        };
        resolve_base_uri(&mut unversioned);
        assert_eq!(
            unversioned.base_uri.as_deref(),
            Some("http://api.example.com/{version}")
        );
    }
}
