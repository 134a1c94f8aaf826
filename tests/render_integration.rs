//! End-to-end render scenarios: one configuration in, SQL plus ordered
//! arguments out.

use sqlweave::prelude::*;
use sqlweave::ParamValue;

fn load(xml: &str) -> Configuration {
    load_str(xml).expect("configuration should load")
}

#[test]
fn simple_select_with_placeholder() {
    let config = load(
        r#"<configuration><mappers>
             <mapper namespace="users">
               <select id="find">SELECT * FROM users WHERE id = #{id}</select>
             </mapper>
           </mappers></configuration>"#,
    );
    let (sql, args) = config
        .build_query_with("users.find", &Dialect::MySql, &params! { "id" => 7 })
        .unwrap();
    assert_eq!(sql, "SELECT * FROM users WHERE id = ?");
    assert_eq!(args, vec![ParamValue::Int(7)]);
}

#[test]
fn where_strips_leading_and() {
    let config = load(
        r#"<configuration><mappers>
             <mapper namespace="m">
               <select id="q"><where><if test="id != 0">AND id = #{id}</if></where></select>
             </mapper>
           </mappers></configuration>"#,
    );
    let (sql, args) = config
        .build_query_with("m.q", &Dialect::MySql, &params! { "id" => 3 })
        .unwrap();
    assert_eq!(sql, "WHERE id = ?");
    assert_eq!(args, vec![ParamValue::Int(3)]);
}

#[test]
fn empty_where_renders_nothing() {
    let config = load(
        r#"<configuration><mappers>
             <mapper namespace="m">
               <select id="q"><where><if test="id != 0">AND id = #{id}</if></where></select>
             </mapper>
           </mappers></configuration>"#,
    );
    let (sql, args) = config
        .build_query_with("m.q", &Dialect::MySql, &params! { "id" => 0 })
        .unwrap();
    assert_eq!(sql, "");
    assert!(args.is_empty());
}

#[test]
fn foreach_over_slice() {
    let config = load(
        r#"<configuration><mappers>
             <mapper namespace="m">
               <select id="q">SELECT * FROM t WHERE id IN <foreach collection="ids" item="x" open="(" close=")" separator=",">#{x}</foreach></select>
             </mapper>
           </mappers></configuration>"#,
    );
    let (sql, args) = config
        .build_query_with(
            "m.q",
            &Dialect::MySql,
            &params! { "ids" => vec![10, 20, 30] },
        )
        .unwrap();
    assert_eq!(sql, "SELECT * FROM t WHERE id IN (?,?,?)");
    assert_eq!(
        args,
        vec![ParamValue::Int(10), ParamValue::Int(20), ParamValue::Int(30)]
    );
}

#[test]
fn foreach_over_empty_slice() {
    let config = load(
        r#"<configuration><mappers>
             <mapper namespace="m">
               <select id="q">SELECT * FROM t WHERE id IN <foreach collection="ids" item="x" open="(" close=")" separator=",">#{x}</foreach></select>
             </mapper>
           </mappers></configuration>"#,
    );
    let (sql, args) = config
        .build_query_with(
            "m.q",
            &Dialect::MySql,
            &params! { "ids" => Vec::<i64>::new() },
        )
        .unwrap();
    assert_eq!(sql, "SELECT * FROM t WHERE id IN");
    assert!(args.is_empty());
}

#[test]
fn choose_picks_first_non_empty_when() {
    let config = load(
        r#"<configuration><mappers>
             <mapper namespace="m">
               <select id="q">
                 <choose>
                   <when test="a &gt; 0">a = #{a}</when>
                   <when test="b &gt; 0">b = #{b}</when>
                   <otherwise>X</otherwise>
                 </choose>
               </select>
             </mapper>
           </mappers></configuration>"#,
    );
    let (sql, args) = config
        .build_query_with("m.q", &Dialect::MySql, &params! { "a" => 0, "b" => 5 })
        .unwrap();
    assert_eq!(sql, "b = ?");
    assert_eq!(args, vec![ParamValue::Int(5)]);
}

#[test]
fn include_resolves_across_namespaces() {
    let config = load(
        r#"<configuration><mappers>
             <mapper namespace="A">
               <sql id="cols">id, name</sql>
             </mapper>
             <mapper namespace="B">
               <select id="all">SELECT <include refid="A.cols"/> FROM users</select>
             </mapper>
           </mappers></configuration>"#,
    );
    let (sql, args) = config
        .build_query_with("B.all", &Dialect::MySql, &params! {})
        .unwrap();
    assert_eq!(sql, "SELECT id, name FROM users");
    assert!(args.is_empty());
}

#[test]
fn include_is_transparent() {
    // The same body inline and via include must render identically.
    let config = load(
        r#"<configuration><mappers>
             <mapper namespace="m">
               <sql id="cond">id = #{id}</sql>
               <select id="via_include">SELECT * FROM t WHERE <include refid="cond"/></select>
               <select id="inline">SELECT * FROM t WHERE id = #{id}</select>
             </mapper>
           </mappers></configuration>"#,
    );
    let params = params! { "id" => 9 };
    let included = config
        .build_query_with("m.via_include", &Dialect::Postgres, &params)
        .unwrap();
    let inline = config
        .build_query_with("m.inline", &Dialect::Postgres, &params)
        .unwrap();
    assert_eq!(included, inline);
}

#[test]
fn repeated_renders_are_identical() {
    let config = load(
        r#"<configuration><mappers>
             <mapper namespace="m">
               <select id="q">
                 SELECT * FROM users
                 <where>
                   <if test="id != 0">AND id = #{id}</if>
                   <if test="role != ''">AND role = #{role}</if>
                 </where>
               </select>
             </mapper>
           </mappers></configuration>"#,
    );
    let params = params! { "id" => 4, "role" => "admin" };
    let first = config
        .build_query_with("m.q", &Dialect::Postgres, &params)
        .unwrap();
    for _ in 0..16 {
        let next = config
            .build_query_with("m.q", &Dialect::Postgres, &params)
            .unwrap();
        assert_eq!(next, first);
    }
}

#[test]
fn argument_order_matches_placeholder_order() {
    let config = load(
        r#"<configuration><mappers>
             <mapper namespace="m">
               <update id="q">
                 UPDATE t
                 <set>
                   <if test="name != ''">name = #{name},</if>
                   <if test="age != 0">age = #{age},</if>
                 </set>
                 WHERE id = #{id} AND tenant IN
                 <foreach collection="tenants" item="t" open="(" close=")" separator=", ">#{t}</foreach>
               </update>
             </mapper>
           </mappers></configuration>"#,
    );
    let (sql, args) = config
        .build_query_with(
            "m.q",
            &Dialect::Postgres,
            &params! {
                "name" => "ada",
                "age" => 36,
                "id" => 9,
                "tenants" => vec![1, 2],
            },
        )
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE t SET name = $1, age = $2 WHERE id = $3 AND tenant IN ($4, $5)"
    );
    // One argument per placeholder, in left-to-right placeholder order.
    assert_eq!(
        args,
        vec![
            ParamValue::from("ada"),
            ParamValue::Int(36),
            ParamValue::Int(9),
            ParamValue::Int(1),
            ParamValue::Int(2),
        ]
    );
    for position in 1..=args.len() {
        assert!(sql.contains(&format!("${position}")));
    }
}

#[test]
fn where_is_idempotent_around_where_led_body() {
    let config = load(
        r#"<configuration><mappers>
             <mapper namespace="m">
               <select id="q"><where>WHERE id = #{id}</where></select>
             </mapper>
           </mappers></configuration>"#,
    );
    let (sql, _) = config
        .build_query_with("m.q", &Dialect::MySql, &params! { "id" => 1 })
        .unwrap();
    assert_eq!(sql, "WHERE id = ?");
}

#[test]
fn missing_parameter_aborts_render() {
    let config = load(
        r#"<configuration><mappers>
             <mapper namespace="m">
               <select id="q">SELECT * FROM t WHERE id = #{id}</select>
             </mapper>
           </mappers></configuration>"#,
    );
    let err = config
        .build_query_with("m.q", &Dialect::MySql, &params! {})
        .unwrap_err();
    assert!(matches!(err, sqlweave::RenderError::ParameterNotFound { .. }));
}

#[test]
fn json_parameters_flow_through() {
    let config = load(
        r#"<configuration><mappers>
             <mapper namespace="m">
               <select id="q">SELECT * FROM t WHERE city = #{user.address.city}</select>
             </mapper>
           </mappers></configuration>"#,
    );
    let params = Params::from_json(serde_json::json!({
        "user": {"address": {"city": "Oslo"}}
    }));
    let (sql, args) = config
        .build_query_with("m.q", &Dialect::MySql, &params)
        .unwrap();
    assert_eq!(sql, "SELECT * FROM t WHERE city = ?");
    assert_eq!(args, vec![ParamValue::from("Oslo")]);
}

#[test]
fn concurrent_renders_share_the_configuration() {
    let config = std::sync::Arc::new(load(
        r#"<configuration><mappers>
             <mapper namespace="m">
               <sql id="cols">id, name</sql>
               <select id="q">SELECT <include refid="cols"/> FROM t WHERE id = #{id}</select>
             </mapper>
           </mappers></configuration>"#,
    ));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let config = config.clone();
            std::thread::spawn(move || {
                let (sql, args) = config
                    .build_query_with("m.q", &Dialect::MySql, &params! { "id" => i })
                    .unwrap();
                assert_eq!(sql, "SELECT id, name FROM t WHERE id = ?");
                assert_eq!(args, vec![ParamValue::Int(i)]);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
