//! Build dynamic queries from an inline configuration.
//!
//! Run with: `cargo run --example dynamic_query`

use sqlweave::prelude::*;

const CONFIG: &str = r#"
<configuration>
  <environments default="local">
    <environment id="local">
      <driver>postgres</driver>
      <dataSource>postgres://localhost/demo</dataSource>
    </environment>
  </environments>
  <mappers>
    <mapper namespace="users">
      <sql id="cols">id, name, role, created_at</sql>
      <select id="search">
        SELECT <include refid="cols"/> FROM users
        <where>
          <if test="name != ''">AND name = #{name}</if>
          <if test="min_age != 0">AND age &gt;= #{min_age}</if>
        </where>
        ORDER BY ${order_by}
      </select>
      <select id="byIds">
        SELECT <include refid="cols"/> FROM users WHERE id IN
        <foreach collection="ids" item="id" open="(" close=")" separator=", ">#{id}</foreach>
      </select>
      <update id="touch">
        UPDATE users
        <set>
          <if test="name != ''">name = #{name},</if>
          <if test="role != ''">role = #{role},</if>
        </set>
        WHERE id = #{id}
      </update>
    </mapper>
  </mappers>
</configuration>
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = sqlweave::load_str(CONFIG)?;

    let (sql, args) = config.build_query(
        "users.search",
        &params! { "name" => "ada", "min_age" => 0, "order_by" => "created_at" },
    )?;
    println!("search: {sql}\n        args = {args:?}\n");

    let (sql, args) = config.build_query("users.byIds", &params! { "ids" => vec![3, 5, 8] })?;
    println!("byIds:  {sql}\n        args = {args:?}\n");

    let (sql, args) = config.build_query(
        "users.touch",
        &params! { "id" => 9, "name" => "", "role" => "admin" },
    )?;
    println!("touch:  {sql}\n        args = {args:?}");

    Ok(())
}
