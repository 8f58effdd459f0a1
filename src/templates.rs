use minijinja::Environment;

pub const PLAYER_DETAILS: &str = "player_details.html";

/// Builds the template environment with every page the service renders.
pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(PLAYER_DETAILS, include_str!("../templates/player_details.html"))?;
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_player_details_escapes_names() {
        let env = environment().unwrap();
        let html = env
            .get_template(PLAYER_DETAILS)
            .unwrap()
            .render(context! {
                player => context! {
                    name => "<script>alert(1)</script>",
                    position => "Forward",
                    price => "9.50",
                    current_form => "6.20",
                    epl_team => (),
                    statistics => context! { goals => 4 },
                }
            })
            .unwrap();

        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Forward"));
        assert!(html.contains("goals"));
    }
}
