//! Instruction text sent to the completion service.
//!
//! The system prompt carries the Convex → Supabase transformation rules and
//! the output markup contract the parser recognizes. The builders assemble
//! the user prompt for each pass.

use crate::context::MigrationContext;

/// System instructions attached to every completion request.
pub const SYSTEM_PROMPT: &str = r#"You are an expert React Native and backend developer specializing in migrating
applications from Convex to Supabase.

## Core Transformation Rules

### Backend (convex/ → supabase/)
- Replace `convex/schema.ts` with `supabase/migrations/001_initial.sql` (CREATE TABLE statements with RLS)
- Replace Convex server functions (queries, mutations, actions) with Supabase Edge Functions where needed
- Create `supabase/config.ts` — Supabase client singleton using env vars
- Create `supabase/types.ts` — TypeScript types matching the schema

### Client-side hooks
| Convex | Supabase replacement |
|--------|---------------------|
| `useQuery(api.x.list)` | `useState` + `useEffect` with `supabase.from('x').select()`, or real-time subscription via `supabase.channel()` |
| `useMutation(api.x.create)` | async function calling `supabase.from('x').insert()` |
| `useMutation(api.x.update)` | async function calling `supabase.from('x').update()` |
| `useMutation(api.x.delete)` | async function calling `supabase.from('x').delete()` |
| `useAction(api.x.action)` | async function calling a Supabase Edge Function |
| `ConvexProvider` | wrap app with nothing special; Supabase client is a singleton |
| `ConvexAuthNextjsServerProvider` | `supabase.auth` |

### Auth
- Replace Convex auth with `supabase.auth.signUp()`, `supabase.auth.signInWithPassword()`, etc.
- For session: use `supabase.auth.getSession()` and `supabase.auth.onAuthStateChange()`

### Package changes
- Remove: `convex`, `@convex-dev/*`
- Add: `@supabase/supabase-js`
- Env vars: `EXPO_PUBLIC_SUPABASE_URL`, `EXPO_PUBLIC_SUPABASE_ANON_KEY`

## Output Format

For files to create or modify, use EXACTLY this format (no markdown code fences around it):
<FILE path="relative/path/to/file">
file content here
</FILE>

For files to delete:
<DELETE path="relative/path/to/file" />

Only output files that need to change. Skip files with no Convex references."#;

/// User prompt for the schema pass: the legacy backend's contents plus the
/// project manifests, requesting the fixed set of foundation files.
pub fn schema_prompt(package_json: &str, app_json: &str, legacy_backend: &str) -> String {
    format!(
        r"Analyze this Convex backend and generate the complete Supabase foundation files.

## package.json
{package_json}

## app.json
{app_json}

## Convex backend files
{legacy_backend}

Please generate ALL of the following files:
1. `supabase/migrations/001_initial.sql` — Full schema with CREATE TABLE, RLS policies, and indexes
2. `supabase/types.ts` — TypeScript types matching every table
3. `supabase/config.ts` — Supabase client singleton (use EXPO_PUBLIC_ prefixed env vars for Expo)
4. `.env.example` — Template with EXPO_PUBLIC_SUPABASE_URL and EXPO_PUBLIC_SUPABASE_ANON_KEY
5. Updated `package.json` — Remove convex packages, add @supabase/supabase-js"
    )
}

/// User prompt for one migration batch: shared context plus the verbatim
/// content of each candidate file, with import-path guidance.
pub fn batch_prompt(context: &MigrationContext, files: &[String]) -> String {
    format!(
        r"## Project context (for reference)
{context}

---

## Files to migrate

Migrate each of the following files from Convex to Supabase.
Import the Supabase client from `../../supabase/config` (adjust relative path as needed).
Import types from `../../supabase/types` (adjust relative path as needed).

{files}",
        context = context.as_str(),
        files = files.join("\n"),
    )
}
