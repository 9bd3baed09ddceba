use querycrate::{
    Filter, FilterOperator, ParamValue, ParserConfig, ParserError, RequestCriteria, Sort,
    SortDirection,
};
use serde_json::json;

mod common;
use common::{parse, params_json};

#[test]
fn test_search_request_example() {
    let criteria = parse("sort=-name&filter[status]=active&limit=10&page=2");

    assert_eq!(criteria.limit(), Some(10));
    assert_eq!(criteria.page(), Some(2));
    assert_eq!(criteria.offset(), None);
    assert_eq!(criteria.offset_or(0), 0);
    assert_eq!(criteria.limit_or(25), 10);

    assert_eq!(
        criteria.sort(),
        &Sort::new(Some("-name")).unwrap(),
        "sort is built from the raw `sort` string"
    );
    let mut expected_filter = querycrate::ParamMap::new();
    expected_filter.insert("status".to_string(), "active".into());
    assert_eq!(
        criteria.filter(),
        &Filter::new(&ParamValue::Map(expected_filter)).unwrap()
    );
}

#[test]
fn test_unknown_parameters_stay_available() {
    let criteria = parse("category=shoes&size[]=41&size[]=42&limit=5");
    assert_eq!(
        params_json(&criteria),
        json!({"category": "shoes", "size": ["41", "42"], "limit": "5"})
    );
    assert_eq!(
        criteria.query_param("category"),
        Some(&ParamValue::from("shoes"))
    );
}

#[test]
fn test_parameter_order_follows_input() {
    let criteria = parse("z=1&limit=2&a=3");
    let keys: Vec<&str> = criteria.query_params().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["z", "limit", "a"]);
}

#[test]
fn test_get_query_param_int() {
    let criteria = parse("limit=10");
    assert_eq!(
        criteria.get_query_param("limit", Some("int"), None).unwrap(),
        Some(ParamValue::Int(10))
    );
}

#[test]
fn test_get_query_param_fallback() {
    let criteria = parse("limit=10");
    assert_eq!(
        criteria
            .get_query_param("missing", Some("string"), Some("fallback".into()))
            .unwrap(),
        Some(ParamValue::from("fallback"))
    );
}

#[test]
fn test_array_coercion_preserves_count_and_order() {
    let criteria = parse("ids=c,a,,b");
    let value = criteria.get_query_param("ids", Some("array"), None).unwrap();
    let items = value.as_ref().and_then(ParamValue::as_list).unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(
        items,
        &[
            ParamValue::from("c"),
            ParamValue::from("a"),
            ParamValue::from(""),
            ParamValue::from("b"),
        ]
    );
}

#[test]
fn test_boolean_coercion() {
    let criteria = parse("a=true&b=TRUE&c=false&d=FALSE&e=yes&f=0&g=");
    let as_bool = |name| {
        criteria
            .get_query_param(name, Some("bool"), None)
            .unwrap()
            .and_then(|v| v.as_bool())
    };
    assert_eq!(as_bool("a"), Some(true));
    assert_eq!(as_bool("b"), Some(true));
    assert_eq!(as_bool("c"), Some(false));
    assert_eq!(as_bool("d"), Some(false));
    assert_eq!(as_bool("e"), Some(true));
    assert_eq!(as_bool("f"), Some(false));
    assert_eq!(as_bool("g"), Some(false));
}

#[test]
fn test_string_coercion_joins_lists() {
    let criteria = parse("tags[]=a&tags[]=b");
    assert_eq!(
        criteria.get_query_param("tags", Some("STRING"), None).unwrap(),
        Some(ParamValue::from("a,b"))
    );
}

#[test]
fn test_coercion_does_not_mutate_map() {
    let criteria = parse("ids=1,2");
    let _ = criteria.get_query_param("ids", Some("array"), None).unwrap();
    assert_eq!(criteria.query_param("ids"), Some(&ParamValue::from("1,2")));
}

#[test]
fn test_coercion_failure() {
    let criteria = parse("big=99999999999999999999&nested[a][b]=1");
    assert!(matches!(
        criteria.get_query_param("big", Some("int"), None),
        Err(ParserError::CoercionFailed { .. })
    ));
    assert!(matches!(
        criteria.get_query_param("nested", Some("string"), None),
        Err(ParserError::CoercionFailed { .. })
    ));
}

#[test]
fn test_unsupported_type_token() {
    let criteria = parse("a=1");
    let err = criteria.get_query_param("a", Some("date"), None).unwrap_err();
    assert!(matches!(err, ParserError::UnsupportedType(ref t) if t == "date"));
}

#[test]
fn test_pagination_setters() {
    let mut criteria = parse("");

    for result in [
        criteria.set_limit(Some(-1)).map(|_| ()),
        criteria.set_offset(Some(-1)).map(|_| ()),
        criteria.set_page(Some(-1)).map(|_| ()),
    ] {
        assert!(matches!(result, Err(ParserError::InvalidParam { .. })));
    }

    criteria.set_limit(Some(0)).unwrap();
    assert_eq!(criteria.limit(), Some(0));

    criteria.set_limit(None).unwrap();
    assert_eq!(criteria.limit(), None);
}

#[test]
fn test_negative_pagination_in_query_fails() {
    for query in ["limit=-1", "offset=-5", "page=-2"] {
        let err = RequestCriteria::parse(query).unwrap_err();
        assert!(matches!(err, ParserError::InvalidParam { .. }), "{query}");
    }
}

#[test]
fn test_remove_query_param_keeps_extracted_limit() {
    let mut criteria = parse("limit=10&sort=name");
    criteria.remove_query_param("limit");
    criteria.remove_query_param("sort");

    assert!(criteria.query_param("limit").is_none());
    assert_eq!(criteria.limit(), Some(10));
    assert_eq!(criteria.sort().to_string(), "name");
}

#[test]
fn test_set_filter_and_sort_replace() {
    let mut criteria = parse("sort=a&filter[x]=1");
    criteria
        .set_sort(Sort::default())
        .set_filter(Filter::default())
        .set_phrase(None);
    assert!(criteria.sort().is_empty());
    assert!(criteria.filter().is_empty());
    assert!(criteria.query_param("filter").is_some());
}

#[test]
fn test_filter_operators_from_query() {
    let criteria = parse("filter[age][gte]=18&filter[age][lt]=65&filter[id][in]=1,2,3&filter[deleted_at][null]=");
    let filter = criteria.filter();
    assert_eq!(filter.len(), 4);

    let age: Vec<FilterOperator> = filter.get("age").map(|p| p.operator).collect();
    assert_eq!(age, vec![FilterOperator::Gte, FilterOperator::Lt]);

    let ids = filter.get("id").next().unwrap();
    assert_eq!(ids.operator, FilterOperator::In);
    assert_eq!(
        ids.value,
        ParamValue::List(vec!["1".into(), "2".into(), "3".into()])
    );

    assert_eq!(
        filter.get("deleted_at").next().unwrap().operator,
        FilterOperator::IsNull
    );
}

#[test]
fn test_sort_multiple_fields() {
    let criteria = parse("sort=-created_at,title");
    let directions: Vec<(&str, SortDirection)> = criteria
        .sort()
        .iter()
        .map(|p| (p.field.as_str(), p.direction))
        .collect();
    assert_eq!(
        directions,
        vec![("created_at", SortDirection::Desc), ("title", SortDirection::Asc)]
    );
}

#[test]
fn test_empty_filter_and_sort_values() {
    let criteria = parse("filter=&sort=");
    assert!(criteria.filter().is_empty());
    assert!(criteria.sort().is_empty());
}

#[test]
fn test_round_trip_through_query_string() {
    let criteria = parse("sort=-name&filter[status]=active&filter[tags][]=a&filter[tags][]=b&phrase=red+shoes&x=%26");
    let reparsed = parse(&criteria.to_query_string());
    assert_eq!(reparsed.query_params(), criteria.query_params());
    assert_eq!(reparsed.sort(), criteria.sort());
    assert_eq!(reparsed.filter(), criteria.filter());
    assert_eq!(reparsed.phrase(), Some("red shoes"));
}

#[test]
fn test_parse_with_limits() {
    let config = ParserConfig::default().with_max_vars(1);
    let criteria = RequestCriteria::parse_with("limit=3&page=4", &config).unwrap();
    assert_eq!(criteria.limit(), Some(3));
    assert_eq!(criteria.page(), None);
}

#[test]
fn test_config_from_json() {
    let config: ParserConfig = serde_json::from_value(json!({"max_depth": 1})).unwrap();
    let criteria = RequestCriteria::parse_with("filter[a][eq]=1&keep=1", &config).unwrap();
    assert!(criteria.filter().is_empty());
    assert!(criteria.query_param("filter").is_none());
    assert!(criteria.query_param("keep").is_some());
}
