//! Illustrative "dump" backend (SPEC_FULL §11): walks the resolved program
//! through the driver interface and prints the shape of every decl. Not a
//! code generator for any real target language — it exists only to
//! exercise `adlc_core::driver` end to end.

use adlc_core::ast::DeclBody;
use adlc_core::driver::Driver;
use adlc_core::typeutil::type_expr_to_string;

pub fn run(driver: &Driver<'_>) {
    for (module, decl) in driver.decls() {
        println!("{}.{}", module.name, decl.name);
        match &decl.body {
            DeclBody::Struct(s) => {
                for field in &s.fields {
                    println!("  {}: {}", field.name, type_expr_to_string(&field.type_expr));
                }
            }
            DeclBody::Union(u) => {
                for field in &u.fields {
                    println!("  | {}: {}", field.name, type_expr_to_string(&field.type_expr));
                }
            }
            DeclBody::TypeDef(t) => println!("  = {}", type_expr_to_string(&t.type_expr)),
            DeclBody::NewType(n) => println!("  ~ {}", type_expr_to_string(&n.type_expr)),
        }
    }
}
