use protoclass::{
    ClassError, Method, MethodTable, Result, Value, argument, base_class,
    extend,
};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    Cats,
    Forward,
    Construct,
    Vconstruct,
    Bare,
}

impl Demo {
    pub const ALL: [Demo; 5] = [
        Demo::Cats,
        Demo::Forward,
        Demo::Construct,
        Demo::Vconstruct,
        Demo::Bare,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Demo::Cats => "cats",
            Demo::Forward => "forward",
            Demo::Construct => "construct",
            Demo::Vconstruct => "vconstruct",
            Demo::Bare => "bare",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Demo::Cats => "explicit constructors and overriding",
            Demo::Forward => "omitted constructor forwards to the parent",
            Demo::Construct => "constructor given as __construct",
            Demo::Vconstruct => "__vconstruct hands off to the parent",
            Demo::Bare => "class derived from nothing at all",
        }
    }
}

pub fn run(demo: Demo) -> Result<()> {
    match demo {
        Demo::Cats => cats(),
        Demo::Forward => forward(),
        Demo::Construct => construct(),
        Demo::Vconstruct => vconstruct(),
        Demo::Bare => bare(),
    }
}

/// Name argument, or `fallback` when missing or empty.
fn name_or(args: &[Value], fallback: &str) -> Value {
    let name = argument(args, 0);
    if name.truthy() { name } else { fallback.into() }
}

fn cats() -> Result<()> {
    let cat = base_class().extend((
        Method::new(|this, args| {
            this.set("name", name_or(args, "Cat"));
            Ok(Value::Nil)
        }),
        MethodTable::named("Cat")
            .constant("sound", "meow")
            .method("say", |this, _| {
                println!("{} makes {}", this.get("name")?, this.get("sound")?);
                Ok(Value::Nil)
            })
            .method("hunt", |this, _| {
                println!("{} catches mice", this.get("name")?);
                Ok(Value::Nil)
            }),
    ));

    let tiger = cat.extend((
        Method::new(|this, args| {
            this.set("name", name_or(args, "Tiger"));
            Ok(Value::Nil)
        }),
        MethodTable::named("Tiger")
            .constant("sound", "grooarrr")
            .method("hunt", |this, args| {
                let prey = argument(args, 0);
                let prey = if prey.truthy() { prey } else { "sheep".into() };
                println!("{} hunts {}", this.get("name")?, prey);
                Ok(Value::Nil)
            }),
    ));

    let tom = cat.new_instance(&["Tom".into()])?;
    tom.send("say", &[])?;
    tom.send("hunt", &[])?;

    let tiger = tiger.new_instance(&[])?;
    tiger.send("say", &[])?;
    tiger.send("hunt", &["deer".into()])?;
    tiger.send("hunt", &[])?;
    Ok(())
}

fn forward() -> Result<()> {
    let shape = base_class().extend((
        Method::new(|this, args| {
            this.set("label", argument(args, 0));
            this.set("sides", argument(args, 1));
            Ok(Value::Nil)
        }),
        MethodTable::named("Shape").method("describe", |this, _| {
            Ok(format!("{} with {} sides", this.get("label")?, this.get("sides")?)
                .into())
        }),
    ));

    // no constructor: arguments go straight to Shape's
    let polygon = shape.extend(MethodTable::named("Polygon").method(
        "is_triangle",
        |this, _| Ok((this.get("sides")?.as_i64() == Some(3)).into()),
    ));

    let triangle = polygon.new_instance(&["triangle".into(), 3i64.into()])?;
    println!("{}", triangle.send("describe", &[])?);
    println!("triangle? {}", triangle.send("is_triangle", &[])?);
    println!("{}", triangle.send("to_string", &[])?);
    Ok(())
}

fn construct() -> Result<()> {
    let account = base_class().extend(
        MethodTable::named("Account")
            .construct(|this, args| {
                this.set("owner", argument(args, 0));
                this.set("balance", argument(args, 1).as_i64().unwrap_or(0));
                Ok(Value::Nil)
            })
            .method("deposit", |this, args| {
                let amount = argument(args, 0).as_i64().ok_or_else(|| {
                    ClassError::Type {
                        expected: "fixnum",
                        got: argument(args, 0).type_name().to_string(),
                    }
                })?;
                let balance = this.get("balance")?.as_i64().unwrap_or(0) + amount;
                this.set("balance", balance);
                Ok(balance.into())
            }),
    );

    let savings = account.extend(
        MethodTable::named("Savings")
            .constant("rate", 0.02)
            .method("interest", |this, _| {
                let balance = this.get("balance")?.as_f64().unwrap_or(0.0);
                let rate = this.get("rate")?.as_f64().unwrap_or(0.0);
                Ok((balance * rate).into())
            }),
    );

    let acct = savings.new_instance(&["ada".into(), 100i64.into()])?;
    acct.send("deposit", &[50i64.into()])?;
    println!("{} holds {}", acct.get("owner")?, acct.get("balance")?);
    println!("interest {}", acct.send("interest", &[])?);
    Ok(())
}

fn vconstruct() -> Result<()> {
    let logger = base_class().extend((
        Method::new(|this, args| {
            this.set("prefix", argument(args, 0));
            Ok(Value::Nil)
        }),
        MethodTable::named("Logger").method("log", |this, args| {
            println!("[{}] {}", this.get("prefix")?, argument(args, 0));
            Ok(Value::Nil)
        }),
    ));

    // hook args: (self_class, parent, ...caller args)
    let loud = logger.extend(MethodTable::named("LoudLogger").vconstruct(
        |this, args| {
            let self_class = argument(args, 0);
            let parent = argument(args, 1);
            let prefix = argument(args, 2).to_string().to_uppercase();
            parent.call(this, &[prefix.into()])?;
            this.set("built_by", self_class);
            Ok(Value::Nil)
        },
    ));

    let log = loud.new_instance(&["net".into()])?;
    log.send("log", &["connected".into()])?;
    println!("built by {}", log.get("built_by")?);
    Ok(())
}

fn bare() -> Result<()> {
    let vec2 = extend(
        None,
        MethodTable::named("Vec2")
            .construct(|this, args| {
                this.set("x", argument(args, 0));
                this.set("y", argument(args, 1));
                Ok(Value::Nil)
            })
            .method("dot", |this, args| {
                let other = argument(args, 0);
                let other = other.as_instance().ok_or_else(|| ClassError::Type {
                    expected: "instance",
                    got: other.type_name().to_string(),
                })?;
                let component = |v: Value| v.as_i64().unwrap_or(0);
                Ok((component(this.get("x")?) * component(other.get("x")?)
                    + component(this.get("y")?) * component(other.get("y")?))
                .into())
            }),
    );

    let a = vec2.new_instance(&[1i64.into(), 2i64.into()])?;
    let b = vec2.new_instance(&[3i64.into(), 4i64.into()])?;
    println!("a . b = {}", a.send("dot", &[b.into()])?);

    match a.send("to_string", &[]) {
        Err(err @ ClassError::MissingMember { .. }) => println!("{err}"),
        Err(err) => return Err(err),
        Ok(value) => println!("unexpected {value}"),
    }
    Ok(())
}
