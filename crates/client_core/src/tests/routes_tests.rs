use super::*;

#[test]
fn filter_option_routes_are_scoped_by_school() {
    let routes = CatalogRoutes::new("https://tools.example.edu/bulk_site_creation/").expect("base");
    assert_eq!(
        routes
            .filter_options(FilterKind::Department, "school:colgsas")
            .expect("route")
            .as_str(),
        "https://tools.example.edu/bulk_site_creation/api/schools/school:colgsas/departments"
    );
    assert_eq!(
        routes
            .filter_options(FilterKind::School, "ignored")
            .expect("route")
            .as_str(),
        "https://tools.example.edu/bulk_site_creation/api/schools"
    );
}

#[test]
fn base_without_trailing_slash_keeps_its_path() {
    let routes = CatalogRoutes::new("http://localhost:8000/bulk_site_creation").expect("base");
    assert_eq!(
        routes
            .course_instance_summary("4321", "dept:123")
            .expect("route")
            .as_str(),
        "http://localhost:8000/bulk_site_creation/api/terms/4321/accounts/dept:123/course_instance_summary"
    );
}

#[test]
fn path_parameters_are_percent_encoded() {
    let routes = CatalogRoutes::new("http://localhost:8000/").expect("base");
    let url = routes
        .course_instances("fall 2015", "a/b")
        .expect("route");
    assert_eq!(url.path(), "/api/terms/fall%202015/accounts/a%2Fb/course_instances");
}

#[test]
fn empty_parameters_are_rejected() {
    let routes = CatalogRoutes::new("http://localhost:8000/").expect("base");
    assert_eq!(
        routes.filter_options(FilterKind::Term, " "),
        Err(RouteError::EmptySegment("school_id"))
    );
    assert_eq!(
        routes.course_instance_summary("t1", ""),
        Err(RouteError::EmptySegment("account_id"))
    );
}

#[test]
fn resource_link_id_is_appended_to_every_route() {
    let routes = CatalogRoutes::new("http://localhost:8000/?stale=1")
        .expect("base")
        .with_resource_link_id(Some("abc123".to_string()));
    let url = routes.schools().expect("route");
    assert_eq!(url.query(), Some("resource_link_id=abc123"));

    let url = routes
        .course_instance_summary("t1", "school:abc")
        .expect("route");
    assert_eq!(url.query(), Some("resource_link_id=abc123"));

    let routes = routes.with_resource_link_id(Some("   ".to_string()));
    assert_eq!(routes.schools().expect("route").query(), None);
}

#[test]
fn invalid_base_url_is_reported() {
    assert!(matches!(
        CatalogRoutes::new("not a url"),
        Err(RouteError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        CatalogRoutes::new("mailto:someone@example.edu"),
        Err(RouteError::InvalidBaseUrl { .. })
    ));
}

#[test]
fn create_job_route_carries_resource_link_id() {
    let routes = CatalogRoutes::new("https://tools.example.edu/bulk_site_creation/")
        .expect("base")
        .with_resource_link_id(Some("rl-7".to_string()));
    assert_eq!(
        routes.create_job().expect("route").as_str(),
        "https://tools.example.edu/bulk_site_creation/create_job?resource_link_id=rl-7"
    );
}

#[test]
fn bulk_job_id_is_read_from_relative_and_absolute_locations() {
    let routes = CatalogRoutes::new("https://tools.example.edu/bulk_site_creation/").expect("base");
    assert_eq!(
        routes.bulk_job_id_from_location("/bulk_site_creation/bulk_job_detail/17"),
        Some(BulkJobId(17))
    );
    assert_eq!(
        routes.bulk_job_id_from_location(
            "https://tools.example.edu/bulk_site_creation/bulk_job_detail/42/?resource_link_id=x"
        ),
        Some(BulkJobId(42))
    );
    assert_eq!(routes.bulk_job_id_from_location("bulk_job_detail/abc"), None);
    assert_eq!(routes.bulk_job_id_from_location("/bulk_site_creation/index/17"), None);
}
