use poise::serenity_prelude as serenity;

/// The member issuing a configuration command, as seen by authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor {
    pub user_id: u64,
    /// Permissions granted through `@everyone` and the member's roles.
    pub permissions: serenity::Permissions,
    pub is_owner: bool,
}

impl Actor {
    /// Guild owners and administrators may change monitoring settings.
    pub fn can_configure(&self) -> bool {
        self.is_owner || self.permissions.contains(serenity::Permissions::ADMINISTRATOR)
    }
}

/// Resolve the invoking member's owner flag and role-derived guild permissions.
pub async fn resolve_actor(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<Actor> {
    let guild = guild_id.to_partial_guild(http).await?;
    let is_owner = guild.owner_id == user_id;

    let member = guild_id.member(http, user_id).await?;
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    let mut permissions = serenity::Permissions::empty();
    for role in guild.roles.values() {
        if role.id == everyone_role_id || member.roles.contains(&role.id) {
            permissions |= role.permissions;
        }
    }

    Ok(Actor {
        user_id: user_id.get(),
        permissions,
        is_owner,
    })
}
