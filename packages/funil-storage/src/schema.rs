pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_team_members.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_team_members.sql")),
				"tables/002_leads.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_leads.sql")),
				"tables/003_lead_history.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_lead_history.sql")),
				"tables/004_pipe_propostas.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_pipe_propostas.sql")),
				"tables/005_pipe_confirmacao.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_pipe_confirmacao.sql")),
				"tables/006_pipe_whatsapp.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_pipe_whatsapp.sql")),
				"tables/007_goals.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_goals.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
